//! # Flexiflo Quality-Control Record Models
//!
//! Data model for the two pieces of quality-control paperwork kept by the
//! hose assembly shop, together with the schema descriptions that decide
//! which submissions are accepted.
//!
//! ## Key Models
//!
//! - **JobSheet**: one manufacturing job (order, job details, in-process log, sign-off)
//! - **FinalInspectionReport**: pressure, length and continuity tests plus final acceptance
//! - **Record**: a stored document with its identifier and timestamps
//!
//! ## Validation
//!
//! Every submission goes through [`schema::Schema`]: the same description is
//! interpreted by the client before submitting and by the server before
//! storing. The static types additionally derive `validator::Validate` for
//! the invariants the storage layer re-checks on every write.

pub mod envelope;
pub mod final_inspection;
pub mod job_sheet;
pub mod patch;
pub mod record;
pub mod schema;


pub use envelope::{Envelope, FieldError};
pub use final_inspection::*;
pub use job_sheet::*;
pub use patch::merge_documents;
pub use record::*;
pub use schema::{FieldPath, FieldViolation, PathSegment, Schema, ValidationError};

use serde_json::Value;

/// Validates an untyped job sheet submission.
pub fn validate_job_sheet(input: &Value) -> Result<JobSheet, ValidationError> {
    JobSheet::from_input(input)
}

/// Validates an untyped final inspection report submission.
pub fn validate_final_inspection_report(
    input: &Value,
) -> Result<FinalInspectionReport, ValidationError> {
    FinalInspectionReport::from_input(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job_sheet_input() -> Value {
        json!({
            "orderDetails": {
                "customer": "Acme Offshore",
                "flxTagNo": "FLX-1001",
                "customerTagNo": "C-9",
                "deliveryDueDate": "2024-06-30"
            },
            "jobDetails": {
                "hoseType": "Composite",
                "hoseId": "2in",
                "lengthCut": {"value": 1250},
                "quantity": 4,
                "fittingType": {"endA": "Adaptor A", "endB": ""},
                "moc": ["SS", "CS", "SS"],
                "traceability": {"hoseBatchNumber": "HB-77"}
            },
            "inProcessDetails": {
                "crimpingDetails": {"operatorSign": "JD", "measurements": {"value": 52.5, "unit": "mm"}}
            },
            "remarks": {"piggingOptions": ["Packaging"]},
            "footer": {"supervisorSignature": "R. Patel", "date": "2024-06-01"}
        })
    }

    fn report_input() -> Value {
        json!({
            "staticPressure": {"type": "Hydrostatic"},
            "options": {},
            "finalAcceptance": {},
            "inspector": {"name": "K. Osei"}
        })
    }

    #[test]
    fn test_job_sheet_defaults() {
        let job = validate_job_sheet(&job_sheet_input()).unwrap();

        assert_eq!(job.job_details.length_cut.unit, LengthUnit::Mm);
        assert_eq!(job.job_details.length_cut.value, Some(1250.0));
        assert_eq!(job.job_details.moc, vec![Material::Ss, Material::Cs]);
        assert_eq!(job.order_details.reference, "");
        assert_eq!(job.remarks.pigging_options, vec![PiggingOption::Packaging]);
        let crimping = job.in_process_details.crimping_details.unwrap();
        assert_eq!(crimping.operator_sign, "JD");
        assert_eq!(crimping.measurements.unwrap().unit, Some(LengthUnit::Mm));
        assert!(job.in_process_details.hose_cut_details.is_none());
    }

    #[test]
    fn test_job_sheet_validation_is_idempotent() {
        let job = validate_job_sheet(&job_sheet_input()).unwrap();
        let again = validate_job_sheet(&serde_json::to_value(&job).unwrap()).unwrap();
        assert_eq!(job, again);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut input = job_sheet_input();
        input["jobDetails"]["quantity"] = json!(0);

        let err = validate_job_sheet(&input).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field(), "jobDetails.quantity");
        assert_eq!(err.violations[0].message, "Quantity must be at least 1");
    }

    #[test]
    fn test_missing_customer_points_at_field() {
        let mut input = job_sheet_input();
        input["orderDetails"].as_object_mut().unwrap().remove("customer");

        let err = validate_job_sheet(&input).unwrap_err();
        assert_eq!(err.violations[0].field(), "orderDetails.customer");
        assert_eq!(err.violations[0].message, "Customer name is required");
    }

    #[test]
    fn test_job_sheet_enum_and_date_rules() {
        let mut input = job_sheet_input();
        input["jobDetails"]["fittingType"]["endA"] = json!("Adaptor B");
        input["jobDetails"]["moc"] = json!([]);
        input["footer"]["date"] = json!("not a date");

        let err = validate_job_sheet(&input).unwrap_err();
        assert!(err.message_for("jobDetails.fittingType.endA").is_some());
        assert_eq!(err.message_for("jobDetails.moc"), Some("At least one MOC is required"));
        assert_eq!(err.message_for("footer.date"), Some("Invalid date format"));
    }

    #[test]
    fn test_fractional_quantity_is_rejected() {
        let mut input = job_sheet_input();
        input["jobDetails"]["quantity"] = json!(1.5);
        let err = validate_job_sheet(&input).unwrap_err();
        assert_eq!(err.message_for("jobDetails.quantity"), Some("Expected integer, received float"));
    }

    #[test]
    fn test_job_sheet_text_is_trimmed() {
        let mut input = job_sheet_input();
        input["orderDetails"]["flxTagNo"] = json!("  FLX-1001 ");
        let job = validate_job_sheet(&input).unwrap();
        assert_eq!(job.order_details.flx_tag_no, "FLX-1001");

        input["orderDetails"]["customer"] = json!("   ");
        let err = validate_job_sheet(&input).unwrap_err();
        assert_eq!(err.message_for("orderDetails.customer"), Some("Customer name is required"));
    }

    #[test]
    fn test_oversized_integers_point_at_field() {
        let mut input = job_sheet_input();
        input["jobDetails"]["quantity"] = json!(5_000_000_000u64);
        let err = validate_job_sheet(&input).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field(), "jobDetails.quantity");
        assert_eq!(err.violations[0].message, "Quantity is too large");

        input["jobDetails"]["quantity"] = json!(u32::MAX);
        assert_eq!(validate_job_sheet(&input).unwrap().job_details.quantity, u32::MAX);

        let mut input = report_input();
        input["continuity"] = json!([{"slNo": 99_999_999_999u64}]);
        input["finalAcceptance"] = json!({"acceptedQty": 4_294_967_296u64});
        let err = validate_final_inspection_report(&input).unwrap_err();
        assert_eq!(err.message_for("continuity.0.slNo"), Some("Serial number is too large"));
        assert_eq!(
            err.message_for("finalAcceptance.acceptedQty"),
            Some("Accepted quantity is too large")
        );
        assert!(err.violations.iter().all(|v| !v.path.is_root()));
    }

    #[test]
    fn test_report_with_empty_tables_is_accepted() {
        let report = validate_final_inspection_report(&report_input()).unwrap();

        assert!(report.testing_length.is_empty());
        assert!(report.continuity.is_empty());
        assert!(report.final_acceptance.rows.is_empty());
        assert_eq!(report.static_pressure.result, PressureResult::Pending);
        assert!(!report.options.air_purging);
        assert_eq!(report.final_acceptance.accepted_qty, None);
    }

    #[test]
    fn test_report_row_paths() {
        let mut input = report_input();
        input["continuity"] = json!([{"slNo": 1}, {"tagNo": "T-2"}]);
        input["finalAcceptance"] = json!({"rows": [], "rejectedQty": -1});
        input["staticPressure"]["result"] = json!("maybe");

        let err = validate_final_inspection_report(&input).unwrap_err();
        assert_eq!(err.message_for("continuity.1.slNo"), Some("Serial number is required"));
        assert_eq!(
            err.message_for("finalAcceptance.rejectedQty"),
            Some("Rejected quantity cannot be negative")
        );
        assert!(err.message_for("staticPressure.result").is_some());
    }

    #[test]
    fn test_summaries() {
        let job = validate_job_sheet(&job_sheet_input()).unwrap();
        let now = chrono::Utc::now();
        let record = Record {
            id: "65f1c2a9e4b0a1b2c3d4e5f6".to_string(),
            document: job,
            created_at: now,
            updated_at: now,
        };
        let summary = record.summary();
        assert_eq!(summary.order_details.flx_tag_no, "FLX-1001");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], "65f1c2a9e4b0a1b2c3d4e5f6");
        assert_eq!(value["orderDetails"]["customer"], "Acme Offshore");
        assert!(value.get("createdAt").is_some());
    }
}
