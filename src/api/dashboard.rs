use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};
use serde_json::json;

use crate::api::data::{latest_sample, sample_json};
use crate::entities::{alert, feeding_record, pond};
use crate::quality::classify;

/// Overview payload: every pond with its latest (possibly generated)
/// reading and status, the persisted active alert count, and today's
/// total feed mass.
pub async fn dashboard(Extension(db): Extension<DatabaseConnection>) -> Response {
    let ponds = match pond::Entity::find().all(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let mut pond_cards = Vec::with_capacity(ponds.len());
    for p in &ponds {
        let sample = match latest_sample(&db, p).await {
            Ok(s) => s,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        };
        let reading = sample.reading();
        pond_cards.push(json!({
            "id": p.id,
            "name": p.name,
            "area": p.area,
            "species": p.species,
            "status": classify(&reading).as_str(),
            "latest": sample_json(&sample),
        }));
    }

    let active_alert_count = match alert::Entity::find()
        .filter(alert::Column::Status.eq("active"))
        .count(&db)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let now = chrono::Utc::now().naive_utc();
    let day_start = now.date().and_time(chrono::NaiveTime::MIN);
    let today_feeding: Option<Option<f64>> = match feeding_record::Entity::find()
        .select_only()
        .column_as(feeding_record::Column::Amount.sum(), "total")
        .filter(feeding_record::Column::Time.gte(day_start))
        .into_tuple()
        .one(&db)
        .await
    {
        Ok(t) => t,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };
    let today_feeding = today_feeding.flatten().unwrap_or(0.0);

    (
        StatusCode::OK,
        Json(json!({
            "ponds": pond_cards,
            "active_alert_count": active_alert_count,
            "today_feeding_total": (today_feeding * 10.0).round() / 10.0,
            "generated_at": now.format("%Y-%m-%d %H:%M:%S").to_string(),
        })),
    )
        .into_response()
}
