//! Record CRUD, generic over the record type.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use flexiflo_models::{Envelope, Record};
use flexiflo_utils::FlexifloResult;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, Resource};

pub const ADDED: &str = "Report successfully added.";
pub const UPDATED: &str = "Report successfully updated.";
pub const DELETED: &str = "Report successfully deleted.";

fn observe<K: Resource, T>(
    state: &AppState,
    operation: &str,
    result: FlexifloResult<T>,
) -> ApiResult<T> {
    let status = match &result {
        Ok(_) => 200,
        Err(error) => error.http_status_code(),
    };
    state.metrics.record(K::COLLECTION, operation, status);
    result.map_err(ApiError::from)
}

/// POST /create, POST /
pub async fn create_record<K: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Record<K>>>)> {
    let Json(body) = payload?;
    let result = K::service(&state).create(&body).await;
    let record = observe::<K, _>(&state, "create", result)?;
    Ok((StatusCode::CREATED, Json(Envelope::ok_with_message(ADDED, record))))
}

/// GET /list, GET /
pub async fn list_records<K: Resource>(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Record<K>>>>> {
    let result = K::service(&state).list().await;
    let records = observe::<K, _>(&state, "list", result)?;
    Ok(Json(Envelope::ok(records)))
}

/// GET /:id
pub async fn get_record<K: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Record<K>>>> {
    let result = K::service(&state).get(&id).await;
    let record = observe::<K, _>(&state, "get", result)?;
    Ok(Json(Envelope::ok(record)))
}

/// PUT /:id
pub async fn update_record<K: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Envelope<Record<K>>>> {
    let Json(body) = payload?;
    let result = K::service(&state).update(&id, &body).await;
    let record = observe::<K, _>(&state, "update", result)?;
    Ok(Json(Envelope::ok_with_message(UPDATED, record)))
}

/// DELETE /:id
pub async fn delete_record<K: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<K::Summary>>> {
    let result = K::service(&state).delete(&id).await;
    let summary = observe::<K, _>(&state, "delete", result)?;
    Ok(Json(Envelope::ok_with_message(DELETED, summary)))
}
