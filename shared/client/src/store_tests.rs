//! Form store behaviour against an in-process backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok, block_on};

use flexiflo_database::{DocumentService, InMemoryRepository};
use flexiflo_models::{DocumentKind, Envelope, FinalInspectionReport, JobSheet, Record};
use flexiflo_utils::FlexifloError;

use crate::{ApiFailure, ApiResult, FormMode, FormState, FormStore, Notice, ResourceApi};

/// Answers like the server would, without HTTP.
struct LocalApi<K: DocumentKind> {
    service: DocumentService<K>,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl<K: DocumentKind> LocalApi<K> {
    fn new() -> Self {
        Self {
            service: DocumentService::new(Arc::new(InMemoryRepository::<K>::new())),
            calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T>(&self, result: Result<T, FlexifloError>) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiFailure::Network {
                message: "connection refused".to_string(),
            });
        }
        result.map(Envelope::ok).map_err(|error| {
            let envelope = match &error {
                FlexifloError::Validation { violations } => Envelope::invalid(
                    "Validation Error",
                    &flexiflo_models::ValidationError::new(violations.clone()),
                ),
                FlexifloError::NotFound { .. } => Envelope::failure("Report not found"),
                _ => Envelope::failure("Server Error"),
            };
            ApiFailure::Rejected {
                status: error.http_status_code(),
                envelope,
            }
        })
    }
}

#[async_trait]
impl<K: DocumentKind> ResourceApi<K> for LocalApi<K> {
    async fn create(&self, document: &Value) -> ApiResult<Record<K>> {
        let result = self.service.create(document).await;
        self.answer(result)
    }

    async fn list(&self) -> ApiResult<Vec<Record<K>>> {
        let result = self.service.list().await;
        self.answer(result)
    }

    async fn get(&self, id: &str) -> ApiResult<Record<K>> {
        let result = self.service.get(id).await;
        self.answer(result)
    }

    async fn update(&self, id: &str, document: &Value) -> ApiResult<Record<K>> {
        let result = self.service.update(id, document).await;
        self.answer(result)
    }

    async fn delete(&self, id: &str) -> ApiResult<K::Summary> {
        let result = self.service.delete(id).await;
        self.answer(result)
    }
}

fn fill_job_sheet(store: &mut FormStore<JobSheet>) {
    store.update_field(
        "orderDetails",
        json!({"customer": "Acme Offshore", "flxTagNo": "FLX-1001", "deliveryDueDate": "2024-06-30"}),
    );
    store.update_field(
        "jobDetails",
        json!({"hoseType": "Composite", "hoseId": "2in", "quantity": 4, "moc": ["SS"]}),
    );
    store.update_field("jobDetails.traceability", json!({"hoseBatchNumber": "HB-77"}));
    store.update_field(
        "footer",
        json!({"supervisorSignature": "R. Patel", "date": "2024-06-01"}),
    );
}

#[test]
fn test_invalid_form_is_not_sent() {
    let api = LocalApi::<JobSheet>::new();
    let mut store: FormStore<JobSheet> = FormStore::new();

    let saved = block_on(store.submit(&api));
    assert!(saved.is_none());
    assert_eq!(store.state(), FormState::Invalid);
    assert_eq!(api.calls(), 0);
    assert_eq!(
        store.error_for("orderDetails.customer"),
        Some("Customer name is required")
    );
    assert_eq!(store.error_for("jobDetails.quantity"), Some("Quantity must be at least 1"));

    store.update_field("orderDetails", json!({"customer": "Acme"}));
    assert_eq!(store.state(), FormState::Idle);
}

#[test]
fn test_create_then_edit() {
    let api = LocalApi::<JobSheet>::new();
    let mut store: FormStore<JobSheet> = FormStore::new();
    fill_job_sheet(&mut store);

    let created = block_on(store.submit(&api)).unwrap();
    assert_eq!(store.state(), FormState::Succeeded);
    assert_eq!(
        store.notice,
        Some(Notice::Success("Report saved successfully.".to_string()))
    );
    assert_eq!(store.form_data, <JobSheet as crate::FormDocument>::blank_form());

    assert_ok!(store.load_for_edit(&created));
    assert_eq!(store.state(), FormState::Idle);
    store.update_field("orderDetails", json!({"reference": "PO-55"}));

    let updated = block_on(store.submit(&api)).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.document.order_details.reference, "PO-55");
    assert_eq!(store.detail.data.as_ref(), Some(&updated));
    assert_eq!(store.mode, FormMode::Edit { id: created.id.clone() });
}

#[test]
fn test_edit_of_deleted_record_reports_not_found() {
    let api = LocalApi::<JobSheet>::new();
    let mut store: FormStore<JobSheet> = FormStore::new();
    fill_job_sheet(&mut store);
    let created = block_on(store.submit(&api)).unwrap();

    // The record vanished server side; the edit hits a 404.
    block_on(api.service.delete(&created.id)).unwrap();
    assert_ok!(store.load_for_edit(&created));
    assert!(block_on(store.submit(&api)).is_none());
    assert_eq!(store.state(), FormState::Failed);
    assert_eq!(
        store.notice,
        Some(Notice::Error("Report not found".to_string()))
    );
    assert!(store.errors.is_empty());
}

#[test]
fn test_network_failure_shows_generic_notice() {
    let api = LocalApi::<FinalInspectionReport>::new();
    api.offline.store(true, Ordering::SeqCst);
    let mut store: FormStore<FinalInspectionReport> = FormStore::new();
    store.set_field("staticPressure.type", json!("Hydrostatic"));

    assert!(block_on(store.submit(&api)).is_none());
    assert_eq!(store.state(), FormState::Failed);
    assert_eq!(
        store.notice.as_ref().map(Notice::text),
        Some("Failed to save report. Please try again.")
    );

    store.dismiss_notice();
    assert!(store.notice.is_none());
}

#[test]
fn test_list_detail_and_delete() {
    let api = LocalApi::<FinalInspectionReport>::new();
    let mut store: FormStore<FinalInspectionReport> = FormStore::new();
    for test_type in ["Hydrostatic", "Pneumatic"] {
        store.set_field("staticPressure.type", json!(test_type));
        assert!(block_on(store.submit(&api)).is_some());
    }

    block_on(store.fetch_list(&api));
    let records = store.list.data.clone().unwrap();
    assert_eq!(records.len(), 2);
    assert!(!store.list.loading);

    block_on(store.fetch_detail(&api, &records[0].id));
    assert_eq!(store.detail.data.as_ref(), Some(&records[0]));

    let summary = block_on(store.delete(&api, &records[0].id)).unwrap();
    assert_eq!(summary.static_pressure.test_type, "Hydrostatic");
    assert_eq!(store.list.data.as_ref().map(Vec::len), Some(1));
    assert!(store.detail.data.is_none());

    block_on(store.fetch_detail(&api, &records[0].id));
    assert_eq!(store.detail.error.as_deref(), Some("Report not found"));
}

#[test]
fn test_failed_list_fetch_keeps_form() {
    let api = LocalApi::<JobSheet>::new();
    let mut store: FormStore<JobSheet> = FormStore::new();
    fill_job_sheet(&mut store);
    let before = store.form_data.clone();

    api.offline.store(true, Ordering::SeqCst);
    block_on(store.fetch_list(&api));
    assert_eq!(store.list.error.as_deref(), Some("Failed to fetch job sheets."));
    assert_eq!(store.form_data, before);
    assert_eq!(store.state(), FormState::Idle);
}

#[test]
fn test_malformed_id_is_rejected() {
    let api = LocalApi::<JobSheet>::new();
    let failure = block_on(ResourceApi::get(&api, "nope"));
    let failure = assert_err!(failure);
    assert_eq!(failure.status(), Some(400));
}
