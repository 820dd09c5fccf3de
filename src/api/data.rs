use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use serde_json::json;

use crate::entities::{pond, water_quality};
use crate::quality::classify;
use crate::sampling::SampleRecord;
use crate::synthetic::{self, Baseline, SpeciesProfile, DASHBOARD_24H, STANDARD};

/// Latest persisted sample for the pond, or a generated one when the pond
/// has no rows yet. Callers can tell which they got.
pub(crate) async fn latest_sample(
    db: &DatabaseConnection,
    p: &pond::Model,
) -> Result<SampleRecord, DbErr> {
    let latest = water_quality::Entity::find()
        .filter(water_quality::Column::PondId.eq(p.id))
        .order_by_desc(water_quality::Column::Timestamp)
        .one(db)
        .await?;

    Ok(match latest {
        Some(m) => SampleRecord::Persisted(m),
        None => {
            let profile = SpeciesProfile::for_species(&p.species);
            SampleRecord::Synthetic(synthetic::sample_at(
                Baseline::Species(profile),
                &STANDARD,
                chrono::Utc::now().naive_utc(),
            ))
        }
    })
}

/// Full-field JSON for one sample, shared by the query endpoints.
pub(crate) fn sample_json(record: &SampleRecord) -> serde_json::Value {
    json!({
        "timestamp": record.timestamp().format("%Y-%m-%d %H:%M").to_string(),
        "temperature": record.temperature(),
        "dissolved_oxygen": record.dissolved_oxygen(),
        "ph": record.ph(),
        "ammonia": record.ammonia(),
        "turbidity": record.turbidity(),
        "conductivity": record.conductivity(),
        "water_level": record.water_level(),
        "cod": record.cod(),
        "heavy_metals": record.heavy_metals(),
        "residual_chlorine": record.residual_chlorine(),
        "total_phosphorus": record.total_phosphorus(),
        "total_nitrogen": record.total_nitrogen(),
        "coliform": record.coliform(),
        "algae": record.algae(),
        "biotoxicity": record.biotoxicity(),
        "is_synthetic": record.is_synthetic(),
    })
}

pub async fn list_ponds(Extension(db): Extension<DatabaseConnection>) -> Response {
    let ponds = match pond::Entity::find().all(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let mut out = Vec::with_capacity(ponds.len());
    for p in &ponds {
        let sample = match latest_sample(&db, p).await {
            Ok(s) => s,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                    .into_response()
            }
        };
        let reading = sample.reading();
        out.push(json!({
            "id": p.id,
            "name": p.name,
            "area": p.area,
            "species": p.species,
            "status": classify(&reading).as_str(),
            "latest": sample_json(&sample),
        }));
    }

    (StatusCode::OK, Json(json!({"ponds": out}))).into_response()
}

pub async fn pond_detail(
    Extension(db): Extension<DatabaseConnection>,
    Path(pond_id): Path<i32>,
) -> Response {
    let p = match pond::Entity::find_by_id(pond_id).one(&db).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Json(json!({"error": "Pond not found"})))
                .into_response()
        }
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let now = chrono::Utc::now().naive_utc();
    let since = now - chrono::Duration::hours(24);
    let rows = match water_quality::Entity::find()
        .filter(water_quality::Column::PondId.eq(p.id))
        .filter(water_quality::Column::Timestamp.gte(since))
        .order_by_asc(water_quality::Column::Timestamp)
        .all(&db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    // The 24h chart uses the tighter dashboard preset when there is no
    // persisted history to draw from.
    let history: Vec<SampleRecord> = if rows.is_empty() {
        let mut generated = synthetic::recent_hours(Baseline::Neutral, &DASHBOARD_24H, now, 24);
        generated.reverse();
        generated.into_iter().map(SampleRecord::Synthetic).collect()
    } else {
        rows.into_iter().map(SampleRecord::Persisted).collect()
    };

    let latest = match latest_sample(&db, &p).await {
        Ok(s) => s,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };
    let reading = latest.reading();

    (
        StatusCode::OK,
        Json(json!({
            "pond": {
                "id": p.id,
                "name": p.name,
                "area": p.area,
                "species": p.species,
            },
            "status": classify(&reading).as_str(),
            "latest": sample_json(&latest),
            "history": history.iter().map(sample_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

#[derive(serde::Deserialize)]
pub struct WaterQualityQuery {
    days: Option<i64>,
    compare: Option<bool>,
}

/// Persisted samples for the window, synthetic fallback otherwise.
pub(crate) async fn window_records(
    db: &DatabaseConnection,
    p: &pond::Model,
    end: chrono::NaiveDateTime,
    days: i64,
) -> Result<Vec<SampleRecord>, DbErr> {
    let start = end - chrono::Duration::days(days);
    let rows = water_quality::Entity::find()
        .filter(water_quality::Column::PondId.eq(p.id))
        .filter(water_quality::Column::Timestamp.gte(start))
        .filter(water_quality::Column::Timestamp.lte(end))
        .order_by_asc(water_quality::Column::Timestamp)
        .all(db)
        .await?;

    if rows.is_empty() {
        let profile = SpeciesProfile::for_species(&p.species);
        Ok(synthetic::window_series(profile, end, days)
            .into_iter()
            .map(SampleRecord::Synthetic)
            .collect())
    } else {
        Ok(rows.into_iter().map(SampleRecord::Persisted).collect())
    }
}

pub async fn water_quality_history(
    Extension(db): Extension<DatabaseConnection>,
    Path(pond_id): Path<i32>,
    Query(query): Query<WaterQualityQuery>,
) -> Response {
    let p = match pond::Entity::find_by_id(pond_id).one(&db).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Json(json!({"error": "Pond not found"})))
                .into_response()
        }
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let days = query.days.unwrap_or(1).max(1);
    let now = chrono::Utc::now().naive_utc();

    let records = match window_records(&db, &p, now, days).await {
        Ok(r) => r,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let comparison = if query.compare.unwrap_or(false) {
        let previous_end = now - chrono::Duration::days(days);
        match window_records(&db, &p, previous_end, days).await {
            Ok(r) => Some(r.iter().map(sample_json).collect::<Vec<_>>()),
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        }
    } else {
        None
    };

    // Feed-event markers only make sense at hourly granularity.
    let events: Vec<serde_json::Value> = if days <= 7 {
        let profile = SpeciesProfile::for_species(&p.species);
        (0..days)
            .flat_map(|i| {
                let day = now - chrono::Duration::days(days - 1 - i);
                synthetic::daily_feedings(profile, p.area, day)
            })
            .filter(|f| f.time <= now)
            .map(|f| {
                json!({
                    "time": f.time.format("%Y-%m-%d %H:%M").to_string(),
                    "type": "feeding",
                    "description": format!("{} {}kg", f.notes, f.amount),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    (
        StatusCode::OK,
        Json(json!({
            "pond_id": p.id,
            "pond_name": p.name,
            "days": days,
            "data": records.iter().map(sample_json).collect::<Vec<_>>(),
            "comparison": comparison,
            "events": events,
        })),
    )
        .into_response()
}

pub async fn latest_water_quality(Extension(db): Extension<DatabaseConnection>) -> Response {
    let ponds = match pond::Entity::find().all(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let mut out = serde_json::Map::new();
    for p in &ponds {
        let sample = match latest_sample(&db, p).await {
            Ok(s) => s,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                    .into_response()
            }
        };
        out.insert(p.id.to_string(), sample_json(&sample));
    }

    (StatusCode::OK, Json(serde_json::Value::Object(out))).into_response()
}
