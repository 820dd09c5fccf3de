use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A computed feeding recommendation. `applied` flips to true once a
/// matching feeding record is created; `rejected`/`rejected_at` record an
/// explicit operator rejection. Decisions are retained either way.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "feeding_decisions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pond_id: i32,
    pub recommended_amount: f64,
    #[sea_orm(column_type = "Text")]
    pub reasoning: String,
    pub created_at: DateTime,
    pub applied: bool,
    pub rejected: bool,
    pub rejected_at: Option<DateTime>,
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
