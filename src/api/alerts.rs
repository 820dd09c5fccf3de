use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;
use uuid::Uuid;

use crate::alert_rules::{history_content, AlertKind};
use crate::alert_store::AlertSessionStore;
use crate::entities::pond;
use crate::metrics;

async fn all_ponds(db: &DatabaseConnection) -> Result<Vec<pond::Model>, sea_orm::DbErr> {
    pond::Entity::find().all(db).await
}

pub async fn active_alerts(
    Extension(db): Extension<DatabaseConnection>,
    Extension(store): Extension<Arc<AlertSessionStore>>,
    Extension(session): Extension<Uuid>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };
    let alerts = store.active_alerts(session, &ponds);
    (StatusCode::OK, Json(json!({"success": true, "alerts": alerts}))).into_response()
}

pub async fn refresh_alerts(
    Extension(db): Extension<DatabaseConnection>,
    Extension(store): Extension<Arc<AlertSessionStore>>,
    Extension(session): Extension<Uuid>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };
    let alerts = store.refresh(session, &ponds);
    (StatusCode::OK, Json(json!({"success": true, "alerts": alerts}))).into_response()
}

pub async fn mark_resolved(
    Extension(db): Extension<DatabaseConnection>,
    Extension(store): Extension<Arc<AlertSessionStore>>,
    Extension(session): Extension<Uuid>,
    Path(alert_id): Path<u32>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };
    if store.resolve(session, alert_id, &ponds) {
        metrics::increment_alerts_resolved(1);
        (StatusCode::OK, Json(json!({"success": true, "message": "预警已标记为解决"})))
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "未找到该预警"})),
        )
            .into_response()
    }
}

pub async fn mark_all_resolved(
    Extension(db): Extension<DatabaseConnection>,
    Extension(store): Extension<Arc<AlertSessionStore>>,
    Extension(session): Extension<Uuid>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };
    let still_active = store
        .active_alerts(session, &ponds)
        .iter()
        .filter(|a| a.status == "active")
        .count();
    store.resolve_all(session, &ponds);
    metrics::increment_alerts_resolved(still_active as u64);
    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "所有预警已标记为解决", "count": still_active})),
    )
        .into_response()
}

/// Polling endpoint: alerts this session has not seen yet.
pub async fn check_alerts(
    Extension(db): Extension<DatabaseConnection>,
    Extension(store): Extension<Arc<AlertSessionStore>>,
    Extension(session): Extension<Uuid>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };
    let new_alerts = store.check_new(session, &ponds);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": new_alerts.len(),
            "new_alerts": new_alerts,
        })),
    )
        .into_response()
}

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    level: Option<String>,
    status: Option<String>,
    pond: Option<String>,
}

const HISTORY_KINDS: [AlertKind; 4] = [
    AlertKind::DissolvedOxygen,
    AlertKind::Temperature,
    AlertKind::Ph,
    AlertKind::Ammonia,
];

/// 50 generated history entries over the last week, filterable by level,
/// status and pond, newest first.
pub async fn alert_history(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };
    if ponds.is_empty() {
        return (StatusCode::OK, Json(json!({"success": true, "alerts": []}))).into_response();
    }

    let now = chrono::Utc::now().naive_utc();
    let mut rng = rand::thread_rng();
    let levels = ["info", "warning", "danger"];

    let mut entries: Vec<serde_json::Value> = (0..50)
        .filter_map(|i| {
            let p = ponds.choose(&mut rng)?;
            let kind = *HISTORY_KINDS.choose(&mut rng)?;
            let (title, message) = history_content(kind, &p.name);
            let timestamp = now - chrono::Duration::minutes(rng.gen_range(5..10080));
            let status = if rng.gen_bool(0.7) { "resolved" } else { "active" };
            let level = levels.choose(&mut rng)?;
            Some(json!({
                "id": i + 1,
                "pond_id": p.id,
                "pond_name": p.name,
                "type": kind.key(),
                "title": title,
                "message": message,
                "level": level,
                "status": status,
                "timestamp": timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            }))
        })
        .filter(|entry| {
            let keep_level = query
                .level
                .as_deref()
                .map_or(true, |l| entry["level"] == l);
            let keep_status = query
                .status
                .as_deref()
                .map_or(true, |s| entry["status"] == s);
            let keep_pond = query.pond.as_deref().map_or(true, |p| {
                entry["pond_name"] == p || entry["pond_id"].to_string() == p
            });
            keep_level && keep_status && keep_pond
        })
        .collect();

    entries.sort_by(|a, b| b["timestamp"].as_str().cmp(&a["timestamp"].as_str()));

    (StatusCode::OK, Json(json!({"success": true, "alerts": entries}))).into_response()
}

/// Counts over the session's alert list, plus simulated trend numbers for
/// the statistics cards.
pub async fn statistics(
    Extension(db): Extension<DatabaseConnection>,
    Extension(store): Extension<Arc<AlertSessionStore>>,
    Extension(session): Extension<Uuid>,
) -> Response {
    let ponds = match all_ponds(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };

    let alerts = store.active_alerts(session, &ponds);
    let active: Vec<_> = alerts.iter().filter(|a| a.status != "resolved").collect();

    let by_level = |level: &str| active.iter().filter(|a| a.level == level).count();
    let mut by_type = serde_json::Map::new();
    for kind in AlertKind::ALL {
        let count = active.iter().filter(|a| a.kind == kind.key()).count();
        by_type.insert(kind.key().to_string(), json!(count));
    }

    let mut rng = rand::thread_rng();
    let weekly_trend: Vec<u32> = (0..7).map(|_| rng.gen_range(0..10)).collect();

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "total_active": active.len(),
            "by_level": {
                "danger": by_level("danger"),
                "warning": by_level("warning"),
                "info": by_level("info"),
            },
            "by_type": by_type,
            "resolved_today": rng.gen_range(3..8),
            "weekly_trend": weekly_trend,
        })),
    )
        .into_response()
}
