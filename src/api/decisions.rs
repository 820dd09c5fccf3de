use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::json;

use crate::analysis::{self, AnalysisError, DecisionAnalysis};
use crate::api::data::latest_sample;
use crate::entities::{feeding_decision, feeding_record, pond};
use crate::feeding::{feeding_reasoning, recommended_amount};
use crate::metrics;
use crate::quality::classify;

const FEEDING_TIMES: [&str; 3] = ["8:00", "14:00", "20:00"];

async fn hours_since_last_feeding(
    db: &DatabaseConnection,
    pond_id: i32,
    now: NaiveDateTime,
) -> Result<Option<f64>, DbErr> {
    let last = feeding_record::Entity::find()
        .filter(feeding_record::Column::PondId.eq(pond_id))
        .order_by_desc(feeding_record::Column::Time)
        .one(db)
        .await?;
    Ok(last.map(|r| (now - r.time).num_minutes() as f64 / 60.0))
}

/// Scalar SUM of today's feed mass for the pond.
async fn fed_today(
    db: &DatabaseConnection,
    pond_id: i32,
    now: NaiveDateTime,
) -> Result<f64, DbErr> {
    let day_start = now.date().and_time(chrono::NaiveTime::MIN);
    let total: Option<Option<f64>> = feeding_record::Entity::find()
        .select_only()
        .column_as(feeding_record::Column::Amount.sum(), "total")
        .filter(feeding_record::Column::PondId.eq(pond_id))
        .filter(feeding_record::Column::Time.gte(day_start))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

struct Recommendation {
    reading: crate::quality::Reading,
    is_synthetic: bool,
    hours_since_feeding: Option<f64>,
    amount: f64,
    reasoning: String,
}

async fn recommend(
    db: &DatabaseConnection,
    p: &pond::Model,
    now: NaiveDateTime,
) -> Result<Recommendation, DbErr> {
    let sample = latest_sample(db, p).await?;
    let reading = sample.reading();
    let hours = hours_since_last_feeding(db, p.id, now).await?;
    let amount = recommended_amount(p.area, &reading, hours);
    let reasoning = feeding_reasoning(&p.name, p.area, &p.species, &reading, amount, hours);
    Ok(Recommendation {
        is_synthetic: sample.is_synthetic(),
        reading,
        hours_since_feeding: hours,
        amount,
        reasoning,
    })
}

fn reading_json(r: &crate::quality::Reading) -> serde_json::Value {
    json!({
        "temperature": r.temperature,
        "dissolved_oxygen": r.dissolved_oxygen,
        "ph": r.ph,
        "ammonia": r.ammonia,
    })
}

pub async fn pond_status(
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
    let sample = match latest_sample(&db, &p).await {
        Ok(s) => s,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };
    let hours = match hours_since_last_feeding(&db, p.id, now).await {
        Ok(h) => h,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let reading = sample.reading();
    (
        StatusCode::OK,
        Json(json!({
            "pond_id": p.id,
            "pond_name": p.name,
            "water_quality": reading_json(&reading),
            "status": classify(&reading).as_str(),
            "is_synthetic": sample.is_synthetic(),
            "hours_since_last_feeding": hours.map(round1),
        })),
    )
        .into_response()
}

#[derive(serde::Deserialize)]
pub struct DecisionsQuery {
    pond_id: Option<i32>,
}

/// Recommendation preview for one pond or all of them. Nothing is
/// persisted here; that happens on `feeding_decision`.
pub async fn decisions(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<DecisionsQuery>,
) -> Response {
    let ponds = match query.pond_id {
        Some(id) => match pond::Entity::find_by_id(id).one(&db).await {
            Ok(Some(p)) => vec![p],
            Ok(None) => {
                return (StatusCode::NOT_FOUND, Json(json!({"error": "Pond not found"})))
                    .into_response()
            }
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        },
        None => match pond::Entity::find().all(&db).await {
            Ok(p) => p,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        },
    };

    let now = chrono::Utc::now().naive_utc();
    let mut out = Vec::with_capacity(ponds.len());
    for p in &ponds {
        let rec = match recommend(&db, p, now).await {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        };
        out.push(json!({
            "pond_id": p.id,
            "pond_name": p.name,
            "species": p.species,
            "water_status": classify(&rec.reading).as_str(),
            "recommended_amount": rec.amount,
            "reasoning": rec.reasoning,
            "hours_since_last_feeding": rec.hours_since_feeding.map(round1),
        }));
    }

    (StatusCode::OK, Json(json!({"decisions": out}))).into_response()
}

/// Computes and PERSISTS a feeding decision for the pond, with the
/// advisory flavor numbers the decision card shows.
pub async fn feeding_decision(
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
    let rec = match recommend(&db, &p, now).await {
        Ok(r) => r,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let decision = feeding_decision::ActiveModel {
        pond_id: Set(p.id),
        recommended_amount: Set(rec.amount),
        reasoning: Set(rec.reasoning.clone()),
        created_at: Set(now),
        applied: Set(false),
        rejected: Set(false),
        rejected_at: Set(None),
        ..Default::default()
    };
    let decision = match decision.insert(&db).await {
        Ok(d) => d,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };
    metrics::increment_decisions_computed(p.id);

    let mut rng = rand::thread_rng();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "decision_id": decision.id,
            "pond_id": p.id,
            "pond_name": p.name,
            "recommended_amount": rec.amount,
            "reasoning": rec.reasoning,
            "water_quality": reading_json(&rec.reading),
            "is_synthetic": rec.is_synthetic,
            "feed_saving": format!("{}%", rng.gen_range(5..15)),
            "expected_growth": format!("{}g/天", round1(rng.gen_range(0.8..1.5))),
            "feeding_times": FEEDING_TIMES,
        })),
    )
        .into_response()
}

pub async fn decision_detail(
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
    let rec = match recommend(&db, &p, now).await {
        Ok(r) => r,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let since = now - chrono::Duration::days(7);
    let records = match feeding_record::Entity::find()
        .filter(feeding_record::Column::PondId.eq(p.id))
        .filter(feeding_record::Column::Time.gte(since))
        .order_by_asc(feeding_record::Column::Time)
        .all(&db)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    // Daily totals over the last week, oldest first.
    let feeding_history: Vec<serde_json::Value> = (0..7)
        .rev()
        .map(|i| {
            let date = (now - chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
            let total: f64 = records
                .iter()
                .filter(|r| r.time.format("%Y-%m-%d").to_string() == date)
                .map(|r| r.amount)
                .sum();
            json!({"date": date, "amount": round1(total)})
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "pond_id": p.id,
            "pond_name": p.name,
            "area": p.area,
            "species": p.species,
            "water_quality": reading_json(&rec.reading),
            "status": classify(&rec.reading).as_str(),
            "recommended_amount": rec.amount,
            "reasoning": rec.reasoning,
            "hours_since_last_feeding": rec.hours_since_feeding.map(round1),
            "feeding_history": feeding_history,
        })),
    )
        .into_response()
}

async fn load_analysis(
    db: &DatabaseConnection,
    pond_id: i32,
    now: NaiveDateTime,
) -> Result<DecisionAnalysis, AnalysisError> {
    let since = now - chrono::Duration::days(30);
    let records = feeding_record::Entity::find()
        .filter(feeding_record::Column::PondId.eq(pond_id))
        .filter(feeding_record::Column::Time.gte(since))
        .all(db)
        .await?;
    let decisions = feeding_decision::Entity::find()
        .filter(feeding_decision::Column::PondId.eq(pond_id))
        .filter(feeding_decision::Column::CreatedAt.gte(since))
        .all(db)
        .await?;
    Ok(analysis::analyze(now, &records, &decisions))
}

/// 30-day analytics; a failed fetch degrades to zeros instead of a 500 so
/// the dashboard keeps rendering.
pub async fn decision_analysis(
    Extension(db): Extension<DatabaseConnection>,
    Path(pond_id): Path<i32>,
) -> Response {
    let now = chrono::Utc::now().naive_utc();
    let payload = match load_analysis(&db, pond_id, now).await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(pond_id, error = %e, "decision analysis failed, serving zeroed payload");
            DecisionAnalysis::zeroed()
        }
    };
    (StatusCode::OK, Json(payload)).into_response()
}

pub async fn historical_decisions(
    Extension(db): Extension<DatabaseConnection>,
    Path(pond_id): Path<i32>,
) -> Response {
    let now = chrono::Utc::now().naive_utc();
    let since = now - chrono::Duration::days(30);

    let decisions = match feeding_decision::Entity::find()
        .filter(feeding_decision::Column::PondId.eq(pond_id))
        .filter(feeding_decision::Column::CreatedAt.gte(since))
        .order_by_desc(feeding_decision::Column::CreatedAt)
        .all(&db)
        .await
    {
        Ok(d) => d,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };
    let records = match feeding_record::Entity::find()
        .filter(feeding_record::Column::PondId.eq(pond_id))
        .filter(feeding_record::Column::Time.gte(since))
        .all(&db)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let out: Vec<serde_json::Value> = decisions
        .iter()
        .map(|d| {
            // Actual feed within a day of the decision, if any.
            let window_end = d.created_at + chrono::Duration::hours(24);
            let matched: Vec<f64> = records
                .iter()
                .filter(|r| r.time >= d.created_at && r.time <= window_end)
                .map(|r| r.amount)
                .collect();
            let actual = if matched.is_empty() {
                None
            } else {
                Some(round1(matched.iter().sum()))
            };
            json!({
                "id": d.id,
                "date": d.created_at.format("%Y-%m-%d %H:%M").to_string(),
                "recommended_amount": d.recommended_amount,
                "actual_amount": actual,
                "applied": d.applied,
                "rejected": d.rejected,
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({"decisions": out}))).into_response()
}

#[derive(serde::Deserialize)]
pub struct ApplyDecisionRequest {
    decision_id: Option<i32>,
}

/// Applies a decision for the pond: creates the feeding record and flips
/// `applied`. Without an explicit id the pond's latest decision is used.
pub async fn apply_decision(
    Extension(db): Extension<DatabaseConnection>,
    Path(pond_id): Path<i32>,
    payload: Option<Json<ApplyDecisionRequest>>,
) -> Response {
    let requested_id = payload.and_then(|Json(p)| p.decision_id);

    let decision = match requested_id {
        Some(id) => match feeding_decision::Entity::find_by_id(id).one(&db).await {
            Ok(d) => d.filter(|d| d.pond_id == pond_id),
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "message": e.to_string()})),
                )
                    .into_response()
            }
        },
        None => match feeding_decision::Entity::find()
            .filter(feeding_decision::Column::PondId.eq(pond_id))
            .order_by_desc(feeding_decision::Column::CreatedAt)
            .one(&db)
            .await
        {
            Ok(d) => d,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "message": e.to_string()})),
                )
                    .into_response()
            }
        },
    };

    let decision = match decision {
        Some(d) => d,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "message": "没有找到投喂决策"})),
            )
                .into_response()
        }
    };

    let now = chrono::Utc::now().naive_utc();
    let record = feeding_record::ActiveModel {
        pond_id: Set(pond_id),
        amount: Set(decision.recommended_amount),
        time: Set(now),
        notes: Set(Some("按投喂决策执行".to_string())),
        ..Default::default()
    };
    if let Err(e) = record.insert(&db).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": e.to_string()})),
        )
            .into_response();
    }

    let amount = decision.recommended_amount;
    let decision_id = decision.id;
    let mut active = decision.into_active_model();
    active.applied = Set(true);
    if let Err(e) = active.update(&db).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": e.to_string()})),
        )
            .into_response();
    }
    metrics::increment_decisions_applied();

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "投喂决策已应用",
            "decision_id": decision_id,
            "amount": amount,
        })),
    )
        .into_response()
}

#[derive(serde::Deserialize)]
pub struct RejectDecisionRequest {
    decision_id: i32,
}

pub async fn reject_decision(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RejectDecisionRequest>,
) -> Response {
    let decision = match feeding_decision::Entity::find_by_id(payload.decision_id)
        .one(&db)
        .await
    {
        Ok(Some(d)) => d,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "message": "没有找到投喂决策"})),
            )
                .into_response()
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "message": e.to_string()})),
            )
                .into_response()
        }
    };

    let mut active = decision.into_active_model();
    active.applied = Set(false);
    active.rejected = Set(true);
    active.rejected_at = Set(Some(chrono::Utc::now().naive_utc()));
    if let Err(e) = active.update(&db).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": e.to_string()})),
        )
            .into_response();
    }
    metrics::increment_decisions_rejected();

    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "已拒绝该投喂建议"})),
    )
        .into_response()
}

/// Per-pond plan for the rest of today: recommendation, what has been fed
/// already, and what remains.
pub async fn today_feeding_plan(Extension(db): Extension<DatabaseConnection>) -> Response {
    let ponds = match pond::Entity::find().all(&db).await {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
                .into_response()
        }
    };

    let now = chrono::Utc::now().naive_utc();
    let mut plan = Vec::with_capacity(ponds.len());
    for p in &ponds {
        let rec = match recommend(&db, p, now).await {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        };
        let fed = match fed_today(&db, p.id, now).await {
            Ok(f) => f,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        };
        plan.push(json!({
            "pond_id": p.id,
            "pond_name": p.name,
            "species": p.species,
            "recommended_amount": rec.amount,
            "fed_today": round1(fed),
            "remaining": round1((rec.amount - fed).max(0.0)),
            "feeding_times": FEEDING_TIMES,
            "reasoning": rec.reasoning,
        }));
    }

    (StatusCode::OK, Json(json!({"plan": plan, "date": now.format("%Y-%m-%d").to_string()})))
        .into_response()
}
