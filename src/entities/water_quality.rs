use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One timestamped multi-parameter measurement for a pond.
///
/// Temperature, pH, dissolved oxygen and ammonia are always present; the
/// remaining probes are optional (not every pond carries the full sensor
/// package).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "water_quality")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pond_id: i32,
    pub temperature: f64,
    pub ph: f64,
    pub dissolved_oxygen: f64,
    pub ammonia: f64,
    pub turbidity: Option<f64>,
    pub conductivity: Option<f64>,
    pub water_level: Option<f64>,
    pub cod: Option<f64>,
    pub heavy_metals: Option<f64>,
    pub residual_chlorine: Option<f64>,
    pub total_phosphorus: Option<f64>,
    pub total_nitrogen: Option<f64>,
    pub coliform: Option<f64>,
    pub algae: Option<f64>,
    pub biotoxicity: Option<f64>,
    pub timestamp: DateTime,
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
