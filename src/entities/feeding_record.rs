use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A logged feed-mass event (kg) for a pond.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "feeding_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pond_id: i32,
    pub amount: f64,
    pub time: DateTime,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pond::Entity",
        from = "Column::PondId",
        to = "super::pond::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Pond,
}

impl Related<super::pond::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pond.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
