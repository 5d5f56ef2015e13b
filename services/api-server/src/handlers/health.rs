use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;
use flexiflo_models::{DocumentKind, FinalInspectionReport, JobSheet};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "flexiflo-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let checks = [
        (JobSheet::COLLECTION, state.jobs.ping().await),
        (FinalInspectionReport::COLLECTION, state.reports.ping().await),
    ];

    let mut all_healthy = true;
    let mut results = serde_json::Map::new();
    for (collection, outcome) in checks {
        let check = match outcome {
            Ok(()) => json!({"status": "healthy", "message": "Connected"}),
            Err(e) => {
                all_healthy = false;
                tracing::warn!(collection, error = %e, "Storage health check failed");
                json!({"status": "unhealthy", "message": "Storage unreachable"})
            }
        };
        results.insert(collection.to_string(), check);
    }

    Json(json!({
        "status": if all_healthy { "healthy" } else { "degraded" },
        "service": "flexiflo-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": results
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
