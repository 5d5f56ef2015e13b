//! Blank forms and repeated-row templates for each record type.

use std::collections::BTreeSet;

use serde_json::{json, Value};

use flexiflo_models::{DocumentKind, FinalInspectionReport, JobSheet};

/// A record type that can be edited through a [`crate::FormStore`].
pub trait FormDocument: DocumentKind {
    /// The form as first shown to the user.
    fn blank_form() -> Value;

    /// Sections expanded when the form is first shown.
    fn default_expanded() -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Empty row for a repeated-row table (dot path), `None` if the path
    /// is not such a table.
    fn blank_row(_table: &str, _sl_no: usize) -> Option<Value> {
        None
    }
}

impl FormDocument for JobSheet {
    fn blank_form() -> Value {
        json!({
            "orderDetails": {
                "customer": "",
                "flxTagNo": "",
                "customerTagNo": "",
                "deliveryDueDate": "",
                "reference": ""
            },
            "jobDetails": {
                "hoseType": "",
                "hoseId": "",
                "lengthCut": {"value": 0, "unit": "mm"},
                "quantity": 0,
                "fittingType": {"endA": "", "endB": ""},
                "moc": [],
                "traceability": {"hoseBatchNumber": "", "flexifloBatchNo": ""}
            },
            "inProcessDetails": {},
            "remarks": {},
            "footer": {"supervisorSignature": "", "date": ""}
        })
    }

    fn default_expanded() -> BTreeSet<String> {
        BTreeSet::from(["orderDetails".to_string()])
    }
}

pub const TESTING_LENGTH: &str = "testingLength";
pub const CONTINUITY: &str = "continuity";
pub const FINAL_ACCEPTANCE_ROWS: &str = "finalAcceptance.rows";

impl FormDocument for FinalInspectionReport {
    fn blank_form() -> Value {
        json!({
            "staticPressure": {
                "type": "",
                "date": "",
                "operator": "",
                "workingPressure": "",
                "testPressure": "",
                "durationWP": "",
                "durationTP": "",
                "gaugeNo": "",
                "result": ""
            },
            "testingLength": [Self::blank_row(TESTING_LENGTH, 1)],
            "continuity": [Self::blank_row(CONTINUITY, 1)],
            "options": {
                "airPurging": false,
                "nitrogenPurging": false,
                "capping": false,
                "blueGoldCleaning": false
            },
            "finalAcceptance": {
                "rows": [Self::blank_row(FINAL_ACCEPTANCE_ROWS, 1)],
                "acceptedQty": 0,
                "rejectedQty": 0
            },
            "inspector": {"name": "", "date": ""}
        })
    }

    fn blank_row(table: &str, sl_no: usize) -> Option<Value> {
        let row = match table {
            TESTING_LENGTH => json!({
                "slNo": sl_no,
                "tagNo": "",
                "gaugeSlNo": "",
                "beforeWithoutWater": "",
                "beforeAt10psi": "",
                "duringTestL1": "",
                "afterTestL2": "",
                "elongationPercent": "",
                "remarks": ""
            }),
            CONTINUITY => json!({
                "slNo": sl_no,
                "tagNo": "",
                "before": "",
                "during": "",
                "after": "",
                "remarks": ""
            }),
            FINAL_ACCEPTANCE_ROWS => json!({
                "slNo": sl_no,
                "tagNo": "",
                "hoseBld": "",
                "assemblyLength": "",
                "endFittingVerification": "",
                "identification": "",
                "colourCodes": "",
                "remarks": ""
            }),
            _ => return None,
        };
        Some(row)
    }
}
