use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A persisted out-of-range condition for a pond.
///
/// `level` is one of `info`/`warning`/`danger`; `status` transitions
/// `active` -> `resolved` only. Alerts are soft-resolved, never deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pond_id: i32,
    pub level: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub timestamp: DateTime,
    pub status: String,
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
