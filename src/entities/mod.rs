pub mod alert;
pub mod feeding_decision;
pub mod feeding_record;
pub mod pond;
pub mod user;
pub mod water_quality;

pub use alert::Entity as Alert;
pub use feeding_decision::Entity as FeedingDecision;
pub use feeding_record::Entity as FeedingRecord;
pub use pond::Entity as Pond;
pub use user::Entity as User;
pub use water_quality::Entity as WaterQuality;
