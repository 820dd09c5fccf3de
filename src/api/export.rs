use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;

use crate::api::data::{sample_json, window_records};
use crate::entities::pond;
use crate::export::{csv_document, export_filename, ExportRow};

#[derive(serde::Deserialize)]
pub struct ExportQuery {
    format: Option<String>,
    days: Option<i64>,
    pond_id: Option<i32>,
}

/// RFC 5987 `filename*` encoding; the filenames carry Chinese text that a
/// plain header value cannot.
fn rfc5987_encode(name: &str) -> String {
    let mut out = String::new();
    for b in name.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn attachment(body: String, content_type: &'static str, filename: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename*=UTF-8''{}", rfc5987_encode(filename)),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn export_data(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format = query.format.as_deref().unwrap_or("csv");
    if !matches!(format, "csv" | "excel" | "json") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("不支持的导出格式: {format}")})),
        )
            .into_response();
    }

    let days = query.days.unwrap_or(7).max(1);
    let now = chrono::Utc::now().naive_utc();
    let start = now - chrono::Duration::days(days);

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

    let mut rows: Vec<ExportRow> = Vec::new();
    for p in &ponds {
        let records = match window_records(&db, p, now, days).await {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        };
        rows.extend(records.into_iter().map(|sample| ExportRow {
            pond_name: p.name.clone(),
            species: p.species.clone(),
            sample,
        }));
    }

    let single_pond = if ponds.len() == 1 { Some(ponds[0].name.as_str()) } else { None };
    let filename = export_filename(single_pond, start, now);

    match format {
        "csv" => attachment(
            csv_document(&rows),
            "text/csv; charset=utf-8",
            &format!("{filename}.csv"),
        ),
        // Excel opens a BOM-prefixed CSV with the headers intact; a real
        // xlsx writer is not part of this stack.
        "excel" => attachment(
            csv_document(&rows),
            "application/vnd.ms-excel",
            &format!("{filename}.xls"),
        ),
        _ => {
            let data: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let mut value = sample_json(&row.sample);
                    if let Some(map) = value.as_object_mut() {
                        map.insert("pond_name".into(), json!(row.pond_name));
                        map.insert("species".into(), json!(row.species));
                    }
                    value
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "pond_info": ponds
                        .iter()
                        .map(|p| json!({
                            "id": p.id,
                            "name": p.name,
                            "area": p.area,
                            "species": p.species,
                        }))
                        .collect::<Vec<_>>(),
                    "export_info": {
                        "start_date": start.format("%Y-%m-%d").to_string(),
                        "end_date": now.format("%Y-%m-%d").to_string(),
                        "days": days,
                        "generated_at": now.format("%Y-%m-%d %H:%M:%S").to_string(),
                        "total_records": data.len(),
                    },
                    "water_quality_data": data,
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::rfc5987_encode;

    #[test]
    fn ascii_passes_through_and_chinese_is_escaped() {
        assert_eq!(rfc5987_encode("report-1.csv"), "report-1.csv");
        assert_eq!(rfc5987_encode("塘"), "%E5%A1%98");
    }
}
