//! Editable form state for one record type.
//!
//! A [`FormStore`] owns the in-progress copy of a form, the field errors
//! shown next to inputs, the banner notice and which sections are
//! expanded. It also keeps the list and detail views of the collection.
//! All changes go through its methods; views only read.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use flexiflo_models::{FieldPath, PathSegment, Record, ValidationError};

use crate::api::{ApiFailure, ResourceApi};
use crate::document::FormDocument;
use crate::fetch::FetchState;
use crate::state::FormState;

/// Whether submitting creates a new record or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Message shown above the form until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }
}

pub struct FormStore<K: FormDocument> {
    pub form_data: Value,
    pub mode: FormMode,
    pub errors: BTreeMap<String, String>,
    pub notice: Option<Notice>,
    pub expanded_sections: BTreeSet<String>,
    pub list: FetchState<Vec<Record<K>>>,
    pub detail: FetchState<Record<K>>,
    state: FormState,
}

impl<K: FormDocument> Default for FormStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FormDocument> FormStore<K> {
    pub fn new() -> Self {
        Self {
            form_data: K::blank_form(),
            mode: FormMode::Create,
            errors: BTreeMap::new(),
            notice: None,
            expanded_sections: K::default_expanded(),
            list: FetchState::new(),
            detail: FetchState::new(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    fn transition(&mut self, next: FormState) {
        if self.state.can_transition_to(next) {
            tracing::trace!(from = %self.state, to = %next, "Form state change");
            self.state = next;
        } else {
            tracing::warn!(from = %self.state, to = %next, "Ignoring invalid form state change");
        }
    }

    /// Leaves a finished submit cycle so the form can be edited again.
    fn settle(&mut self) {
        if self.state.is_settled() {
            self.transition(FormState::Idle);
        }
    }

    /// Shallow-merges `partial` into the object at `section` (dot path).
    /// A non-object `partial` replaces the value. No validation happens
    /// until the next submit.
    pub fn update_field(&mut self, section: &str, partial: Value) {
        self.settle();
        let Some(target) = value_at_mut(&mut self.form_data, &FieldPath::parse(section)) else {
            tracing::warn!(section, "No such form section");
            return;
        };
        match (target, partial) {
            (Value::Object(existing), Value::Object(partial)) => existing.extend(partial),
            (target, partial) => *target = partial,
        }
    }

    /// Sets a single value at a dot path.
    pub fn set_field(&mut self, path: &str, value: Value) {
        self.settle();
        match value_at_mut(&mut self.form_data, &FieldPath::parse(path)) {
            Some(target) => *target = value,
            None => tracing::warn!(path, "No such form field"),
        }
    }

    pub fn toggle_section(&mut self, section: &str) {
        if !self.expanded_sections.remove(section) {
            self.expanded_sections.insert(section.to_string());
        }
    }

    pub fn is_expanded(&self, section: &str) -> bool {
        self.expanded_sections.contains(section)
    }

    /// Back to an empty create form.
    pub fn reset_form(&mut self) {
        if self.state.is_busy() {
            tracing::warn!(state = %self.state, "Not resetting a form mid-submit");
            return;
        }
        self.settle();
        self.form_data = K::blank_form();
        self.mode = FormMode::Create;
        self.errors.clear();
        self.notice = None;
    }

    /// Starts editing a stored record.
    pub fn load_for_edit(&mut self, record: &Record<K>) -> Result<(), serde_json::Error> {
        self.form_data = serde_json::to_value(&record.document)?;
        self.mode = FormMode::Edit {
            id: record.id.clone(),
        };
        self.errors.clear();
        self.notice = None;
        self.settle();
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Runs the shared schema over the form. Errors are recorded by full
    /// dot path, first message per field.
    pub fn validate_local(&mut self) -> Result<K, ValidationError> {
        self.errors.clear();
        K::from_input(&self.form_data).map_err(|error| {
            self.record_errors(
                error
                    .violations
                    .iter()
                    .map(|v| (v.field(), v.message.clone())),
            );
            error
        })
    }

    fn record_errors(&mut self, errors: impl IntoIterator<Item = (String, String)>) {
        for (field, message) in errors {
            self.errors.entry(field).or_insert(message);
        }
    }

    /// Validates locally, then creates or updates the record depending on
    /// the mode. Nothing is sent when local validation fails.
    pub async fn submit(&mut self, api: &dyn ResourceApi<K>) -> Option<Record<K>> {
        if self.state.is_busy() {
            tracing::warn!(state = %self.state, "Submit already in progress");
            return None;
        }
        self.settle();
        self.transition(FormState::Validating);
        self.notice = None;

        if self.validate_local().is_err() {
            self.transition(FormState::Invalid);
            return None;
        }

        self.transition(FormState::Submitting);
        let (result, saved, fallback) = match &self.mode {
            FormMode::Create => (
                api.create(&self.form_data).await,
                "Report saved successfully.",
                "Failed to save report. Please try again.",
            ),
            FormMode::Edit { id } => (
                api.update(id, &self.form_data).await,
                "Report updated successfully.",
                "Failed to update report. Please try again.",
            ),
        };

        match result.map(|envelope| envelope.data) {
            Ok(Some(record)) => {
                match self.mode {
                    FormMode::Create => self.form_data = K::blank_form(),
                    FormMode::Edit { .. } => {
                        if let Ok(value) = serde_json::to_value(&record.document) {
                            self.form_data = value;
                        }
                        self.detail.data = Some(record.clone());
                    }
                }
                self.notice = Some(Notice::Success(saved.to_string()));
                self.transition(FormState::Succeeded);
                Some(record)
            }
            Ok(None) => {
                self.notice = Some(Notice::Error(fallback.to_string()));
                self.transition(FormState::Failed);
                None
            }
            Err(failure) => {
                self.apply_failure(&failure, fallback);
                self.transition(FormState::Failed);
                None
            }
        }
    }

    fn apply_failure(&mut self, failure: &ApiFailure, fallback: &str) {
        let field_errors = failure.field_errors();
        if !field_errors.is_empty() {
            self.record_errors(
                field_errors
                    .iter()
                    .map(|e| (e.field.clone(), e.message.clone())),
            );
            return;
        }
        tracing::warn!(error = %failure, "Request failed");
        let message = failure.message().unwrap_or(fallback);
        self.notice = Some(Notice::Error(message.to_string()));
    }

    /// Deletes a record and drops it from the list and detail views.
    pub async fn delete(&mut self, api: &dyn ResourceApi<K>, id: &str) -> Option<K::Summary> {
        self.errors.clear();
        self.notice = None;

        match api.delete(id).await {
            Ok(envelope) => {
                if let Some(records) = self.list.data.as_mut() {
                    records.retain(|r| r.id != id);
                }
                if self.detail.data.as_ref().is_some_and(|r| r.id == id) {
                    self.detail.clear();
                }
                if self.mode == (FormMode::Edit { id: id.to_string() }) {
                    self.reset_form();
                }
                self.notice = Some(Notice::Success("Report deleted successfully.".to_string()));
                envelope.data
            }
            Err(failure) => {
                tracing::warn!(error = %failure, id, "Delete failed");
                let message = failure
                    .message()
                    .unwrap_or("Failed to delete report. Please try again.");
                self.notice = Some(Notice::Error(message.to_string()));
                None
            }
        }
    }

    /// Loads the list view. The store stays borrowed until the response is
    /// in, so nothing can abandon this fetch while it runs. A view that may
    /// navigate away mid-request drives `self.list` with
    /// [`FetchState::begin`], [`FetchState::abandon`] and
    /// [`FetchState::complete`] itself.
    pub async fn fetch_list(&mut self, api: &dyn ResourceApi<K>) {
        let ticket = self.list.begin();
        let result = api
            .list()
            .await
            .map(|envelope| envelope.data.unwrap_or_default())
            .map_err(|failure| {
                failure
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Failed to fetch {}s.", K::LABEL))
            });
        self.list.complete(ticket, result);
    }

    /// Loads the detail view. Same borrowing caveat as [`Self::fetch_list`].
    pub async fn fetch_detail(&mut self, api: &dyn ResourceApi<K>, id: &str) {
        let ticket = self.detail.begin();
        let result = match api.get(id).await {
            Ok(envelope) => envelope
                .data
                .ok_or_else(|| "Failed to fetch report.".to_string()),
            Err(failure) => Err(failure
                .message()
                .unwrap_or("Failed to fetch report.")
                .to_string()),
        };
        self.detail.complete(ticket, result);
    }

    /// Appends an empty row to a repeated-row table, numbered after the
    /// rows already there.
    pub fn add_row(&mut self, table: &str) -> bool {
        let Some(Value::Array(rows)) = self.form_data.pointer_mut(&json_pointer(table)) else {
            return false;
        };
        match K::blank_row(table, rows.len() + 1) {
            Some(row) => {
                rows.push(row);
                true
            }
            None => false,
        }
    }

    /// Removes a row and renumbers the rest `1..n`.
    pub fn remove_row(&mut self, table: &str, index: usize) -> bool {
        let Some(Value::Array(rows)) = self.form_data.pointer_mut(&json_pointer(table)) else {
            return false;
        };
        if index >= rows.len() {
            return false;
        }
        rows.remove(index);
        for (position, row) in rows.iter_mut().enumerate() {
            if let Value::Object(fields) = row {
                fields.insert("slNo".to_string(), Value::from(position + 1));
            }
        }
        true
    }
}

fn json_pointer(path: &str) -> String {
    format!("/{}", path.replace('.', "/"))
}

/// Walks to `path`, creating missing objects along the way. Array indices
/// must already exist.
fn value_at_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match segment {
            PathSegment::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                current
                    .as_object_mut()?
                    .entry(key.clone())
                    .or_insert(Value::Null)
            }
            PathSegment::Index(index) => current.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexiflo_models::{FinalInspectionReport, JobSheet};
    use serde_json::json;

    #[test]
    fn test_new_store() {
        let store: FormStore<JobSheet> = FormStore::new();
        assert_eq!(store.state(), FormState::Idle);
        assert_eq!(store.mode, FormMode::Create);
        assert!(store.is_expanded("orderDetails"));
        assert!(store.errors.is_empty());
    }

    #[test]
    fn test_update_field_merges_shallowly() {
        let mut store: FormStore<JobSheet> = FormStore::new();
        store.update_field("orderDetails", json!({"customer": "Acme"}));
        store.update_field("jobDetails.lengthCut", json!({"value": 120}));

        assert_eq!(store.form_data["orderDetails"]["customer"], "Acme");
        assert_eq!(store.form_data["orderDetails"]["flxTagNo"], "");
        assert_eq!(store.form_data["jobDetails"]["lengthCut"], json!({"value": 120, "unit": "mm"}));
    }

    #[test]
    fn test_update_field_creates_missing_sections() {
        let mut store: FormStore<JobSheet> = FormStore::new();
        store.update_field("inProcessDetails.hoseCutDetails", json!({"operatorSign": "JK"}));
        assert_eq!(
            store.form_data["inProcessDetails"]["hoseCutDetails"],
            json!({"operatorSign": "JK"})
        );
    }

    #[test]
    fn test_set_field_into_row() {
        let mut store: FormStore<FinalInspectionReport> = FormStore::new();
        store.set_field("continuity.0.tagNo", json!("T-1"));
        assert_eq!(store.form_data["continuity"][0]["tagNo"], "T-1");

        store.set_field("continuity.5.tagNo", json!("T-6"));
        assert_eq!(store.form_data["continuity"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_section() {
        let mut store: FormStore<JobSheet> = FormStore::new();
        store.toggle_section("jobDetails");
        store.toggle_section("orderDetails");
        assert!(store.is_expanded("jobDetails"));
        assert!(!store.is_expanded("orderDetails"));
    }

    #[test]
    fn test_validate_local_keys_errors_by_full_path() {
        let mut store: FormStore<FinalInspectionReport> = FormStore::new();
        store.set_field("testingLength.0.slNo", json!(0));
        store.set_field("continuity.0.slNo", json!(0));

        assert!(store.validate_local().is_err());
        assert_eq!(store.error_for("staticPressure.type"), Some("Type is required"));
        assert_eq!(
            store.error_for("testingLength.0.slNo"),
            Some("Serial number must be at least 1")
        );
        assert!(store.error_for("continuity.0.slNo").is_some());
    }

    #[test]
    fn test_rows_are_numbered() {
        let mut store: FormStore<FinalInspectionReport> = FormStore::new();
        assert!(store.add_row("testingLength"));
        assert!(store.add_row("testingLength"));
        assert!(store.add_row("finalAcceptance.rows"));
        assert_eq!(store.form_data["testingLength"][2]["slNo"], 3);
        assert_eq!(store.form_data["finalAcceptance"]["rows"][1]["slNo"], 2);

        store.set_field("testingLength.2.tagNo", json!("last"));
        assert!(store.remove_row("testingLength", 0));
        let rows = store.form_data["testingLength"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["slNo"], 1);
        assert_eq!(rows[1]["slNo"], 2);
        assert_eq!(rows[1]["tagNo"], "last");

        assert!(!store.remove_row("testingLength", 9));
        assert!(!store.add_row("options"));
    }

    #[test]
    fn test_server_field_errors_keep_first_message() {
        let mut store: FormStore<JobSheet> = FormStore::new();
        let envelope = serde_json::from_value(json!({
            "success": false,
            "message": "Validation Error",
            "errors": [
                {"field": "jobDetails.moc", "message": "At least one MOC is required"},
                {"field": "jobDetails.moc", "message": "Required"}
            ]
        }))
        .unwrap();
        let failure = ApiFailure::Rejected { status: 400, envelope };

        store.apply_failure(&failure, "Failed to save report. Please try again.");
        assert_eq!(store.error_for("jobDetails.moc"), Some("At least one MOC is required"));
        assert!(store.notice.is_none());
    }

    #[test]
    fn test_duplicate_shows_server_message() {
        let mut store: FormStore<JobSheet> = FormStore::new();
        let failure = ApiFailure::Rejected {
            status: 409,
            envelope: flexiflo_models::Envelope::failure("Duplicate entry found"),
        };

        store.apply_failure(&failure, "Failed to save report. Please try again.");
        assert_eq!(
            store.notice,
            Some(Notice::Error("Duplicate entry found".to_string()))
        );
    }

    #[test]
    fn test_abandoned_view_ignores_late_responses() {
        let mut store: FormStore<JobSheet> = FormStore::new();

        let ticket = store.list.begin();
        store.list.abandon();
        assert!(!store.list.complete(ticket, Ok(Vec::new())));
        assert!(store.list.data.is_none());
        assert!(!store.list.loading);

        let stale = store.detail.begin();
        let current = store.detail.begin();
        assert!(!store
            .detail
            .complete(stale, Err("Failed to fetch report.".to_string())));
        assert!(store.detail.error.is_none());
        assert!(store.detail.loading);

        store.reset_form();
        assert!(store
            .detail
            .complete(current, Err("Report not found".to_string())));
        assert_eq!(store.detail.error.as_deref(), Some("Report not found"));
    }

    #[test]
    fn test_reset_form() {
        let mut store: FormStore<JobSheet> = FormStore::new();
        store.update_field("orderDetails", json!({"customer": "Acme"}));
        store.notice = Some(Notice::Error("Server Error".to_string()));
        store.mode = FormMode::Edit {
            id: "507f1f77bcf86cd799439011".to_string(),
        };

        store.reset_form();
        assert_eq!(store.form_data, JobSheet::blank_form());
        assert_eq!(store.mode, FormMode::Create);
        assert!(store.notice.is_none());
    }
}
