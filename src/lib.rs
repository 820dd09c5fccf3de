pub mod alert_rules;
pub mod alert_store;
pub mod analysis;
pub mod api;
pub mod entities;
pub mod export;
pub mod feeding;
pub mod metrics;
pub mod migrator;
pub mod quality;
pub mod sampling;
pub mod seed;
pub mod synthetic;
pub mod telemetry;

pub use sea_orm;
