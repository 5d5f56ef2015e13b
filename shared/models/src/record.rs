//! Persisted records and their list projections.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use validator::Validate;

use crate::final_inspection::{FinalInspectionReport, Inspector, PressureResult};
use crate::job_sheet::JobSheet;
use crate::schema::{
    final_inspection_report_schema, job_sheet_schema, Schema, ValidationError,
};

/// A document type the system stores and serves.
pub trait DocumentKind:
    Serialize + DeserializeOwned + Validate + Clone + Debug + PartialEq + Send + Sync + Unpin + 'static
{
    /// Row shown in list views and returned after a delete.
    type Summary: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Storage collection name.
    const COLLECTION: &'static str;
    /// Path segment the collection is served under.
    const RESOURCE: &'static str;
    const LABEL: &'static str;

    fn schema() -> &'static Schema;

    fn summarize(record: &Record<Self>) -> Self::Summary;

    /// Validates an untyped candidate against the shared schema.
    fn from_input(input: &Value) -> Result<Self, ValidationError> {
        Self::schema().validate(input)
    }
}

/// A stored document with its server-assigned identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub document: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: DocumentKind> Record<T> {
    pub fn summary(&self) -> T::Summary {
        T::summarize(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_details: JobSummaryOrder,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummaryOrder {
    pub customer: String,
    pub flx_tag_no: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalInspectionSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub static_pressure: PressureSummary,
    pub inspector: Inspector,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureSummary {
    #[serde(rename = "type")]
    pub test_type: String,
    pub date: String,
    pub result: PressureResult,
}

impl DocumentKind for JobSheet {
    type Summary = JobSummary;

    const COLLECTION: &'static str = "jobs";
    const RESOURCE: &'static str = "jobs";
    const LABEL: &'static str = "job sheet";

    fn schema() -> &'static Schema {
        job_sheet_schema()
    }

    fn summarize(record: &Record<Self>) -> JobSummary {
        JobSummary {
            id: record.id.clone(),
            order_details: JobSummaryOrder {
                customer: record.document.order_details.customer.clone(),
                flx_tag_no: record.document.order_details.flx_tag_no.clone(),
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl DocumentKind for FinalInspectionReport {
    type Summary = FinalInspectionSummary;

    const COLLECTION: &'static str = "finalinspections";
    const RESOURCE: &'static str = "final-inspection-reports";
    const LABEL: &'static str = "final inspection report";

    fn schema() -> &'static Schema {
        final_inspection_report_schema()
    }

    fn summarize(record: &Record<Self>) -> FinalInspectionSummary {
        let pressure = &record.document.static_pressure;
        FinalInspectionSummary {
            id: record.id.clone(),
            static_pressure: PressureSummary {
                test_type: pressure.test_type.clone(),
                date: pressure.date.clone(),
                result: pressure.result,
            },
            inspector: record.document.inspector.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
