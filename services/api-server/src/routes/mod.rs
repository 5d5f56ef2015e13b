use axum::{
    routing::{get, post},
    Router,
};

use flexiflo_models::{DocumentKind, FinalInspectionReport, JobSheet};

use crate::handlers::*;
use crate::state::{AppState, Resource};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .nest(&format!("/{}", JobSheet::RESOURCE), record_routes::<JobSheet>())
        .nest(
            &format!("/{}", FinalInspectionReport::RESOURCE),
            record_routes::<FinalInspectionReport>(),
        )
}

fn record_routes<K: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records::<K>).post(create_record::<K>))
        .route("/create", post(create_record::<K>))
        .route("/list", get(list_records::<K>))
        .route(
            "/:id",
            get(get_record::<K>)
                .put(update_record::<K>)
                .delete(delete_record::<K>),
        )
}
