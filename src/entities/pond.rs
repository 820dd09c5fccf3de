use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A managed aquaculture water body. `area` is in mu, `species` is the
/// cultured species name as entered by the operator.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "ponds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub area: f64,
    pub species: String,
    pub user_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::water_quality::Entity")]
    WaterQuality,
    #[sea_orm(has_many = "super::feeding_record::Entity")]
    FeedingRecord,
    #[sea_orm(has_many = "super::alert::Entity")]
    Alert,
    #[sea_orm(has_many = "super::feeding_decision::Entity")]
    FeedingDecision,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::water_quality::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaterQuality.def()
    }
}

impl Related<super::feeding_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedingRecord.def()
    }
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl Related<super::feeding_decision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedingDecision.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
