use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use fishfarm_server::{alert_store::AlertSessionStore, api, migrator};
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    fishfarm_server::telemetry::init_telemetry("fishfarm-server");

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Database Connection
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Demo data on first run
    fishfarm_server::seed::seed_demo_data(&db)
        .await
        .expect("Failed to seed demo data");

    // Initialize Metrics
    fishfarm_server::metrics::init_metrics(&db).await;

    let store = Arc::new(AlertSessionStore::new());
    let app = app(db, store, prometheus_layer, metric_handle);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> &'static str {
    "OK"
}

fn app(
    db: DatabaseConnection,
    store: Arc<AlertSessionStore>,
    prometheus_layer: axum_prometheus::PrometheusMetricLayer<'static>,
    metric_handle: metrics_exporter_prometheus::PrometheusHandle,
) -> Router {
    let data_routes = Router::new()
        .route("/api/ponds", get(api::data::list_ponds))
        .route("/api/pond/:id", get(api::data::pond_detail))
        .route("/api/water_quality/:id", get(api::data::water_quality_history))
        .route("/api/latest_water_quality", get(api::data::latest_water_quality))
        .route("/export", get(api::export::export_data));

    let decision_routes = Router::new()
        .route("/api/pond_status/:id", get(api::decisions::pond_status))
        .route("/api/decisions", get(api::decisions::decisions))
        .route("/api/feeding_decision/:id", get(api::decisions::feeding_decision))
        .route("/api/decision_detail/:id", get(api::decisions::decision_detail))
        .route("/api/decision_analysis/:id", get(api::decisions::decision_analysis))
        .route("/api/historical_decisions/:id", get(api::decisions::historical_decisions))
        .route("/api/apply_decision/:id", post(api::decisions::apply_decision))
        .route("/api/reject_decision", post(api::decisions::reject_decision))
        .route("/api/today_feeding_plan", get(api::decisions::today_feeding_plan));

    let alert_routes = Router::new()
        .route("/api/active_alerts", get(api::alerts::active_alerts))
        .route("/api/refresh_alerts", get(api::alerts::refresh_alerts))
        .route("/api/mark_resolved/:id", post(api::alerts::mark_resolved))
        .route("/api/mark_all_resolved", post(api::alerts::mark_all_resolved))
        .route("/check_alerts", post(api::alerts::check_alerts))
        .route("/api/alert_history", get(api::alerts::alert_history))
        .route("/api/statistics", get(api::alerts::statistics));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/dashboard", get(api::dashboard::dashboard))
        .nest("/data", data_routes)
        .nest("/decision", decision_routes)
        .nest("/alert", alert_routes)
        .layer(axum::middleware::from_fn(api::middleware::session_middleware))
        .layer(Extension(db))
        .layer(Extension(store))
        .layer(tower_cookies::CookieManagerLayer::new())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(prometheus_layer)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
}
