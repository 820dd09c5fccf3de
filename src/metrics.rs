use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{alert, feeding_record, pond, water_quality};

pub async fn init_metrics(db: &DatabaseConnection) {
    let pond_count = pond::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("fishfarm_ponds_total").set(pond_count as f64);

    let sample_count = water_quality::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("fishfarm_water_quality_samples_total").set(sample_count as f64);

    let feeding_count = feeding_record::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("fishfarm_feeding_records_total").set(feeding_count as f64);

    // Per-pond sample counts. Pond cardinality is tiny, so a loop is fine.
    let ponds = pond::Entity::find().all(db).await.unwrap_or_default();
    for p in ponds {
        let count = water_quality::Entity::find()
            .filter(water_quality::Column::PondId.eq(p.id))
            .count(db)
            .await
            .unwrap_or(0);
        metrics::gauge!("fishfarm_pond_samples_total", "pond" => p.name).set(count as f64);
    }

    let active_alerts = alert::Entity::find()
        .filter(alert::Column::Status.eq("active"))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("fishfarm_active_alerts_total").set(active_alerts as f64);

    tracing::info!(
        "Initialized metrics: Ponds={}, Samples={}, FeedingRecords={}",
        pond_count,
        sample_count,
        feeding_count
    );
}

pub fn increment_decisions_computed(pond_id: i32) {
    metrics::counter!("fishfarm_feeding_decisions_total", "pond_id" => pond_id.to_string())
        .increment(1);
}

pub fn increment_decisions_applied() {
    metrics::counter!("fishfarm_feeding_decisions_applied_total").increment(1);
}

pub fn increment_decisions_rejected() {
    metrics::counter!("fishfarm_feeding_decisions_rejected_total").increment(1);
}

pub fn increment_alerts_resolved(count: u64) {
    metrics::counter!("fishfarm_session_alerts_resolved_total").increment(count);
}
