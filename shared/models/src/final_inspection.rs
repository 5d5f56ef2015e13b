//! Final inspection report.
//!
//! Independent of any job sheet. The three repeated-row tables carry a
//! 1-based `slNo` assigned on the form when the row is added.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinalInspectionReport {
    #[validate]
    pub static_pressure: StaticPressure,
    #[serde(default)]
    #[validate]
    pub testing_length: Vec<TestingLengthRow>,
    #[serde(default)]
    #[validate]
    pub continuity: Vec<ContinuityRow>,
    pub options: InspectionOptions,
    #[validate]
    pub final_acceptance: FinalAcceptance,
    pub inspector: Inspector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StaticPressure {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub test_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub working_pressure: String,
    #[serde(default)]
    pub test_pressure: String,
    #[serde(default, rename = "durationWP")]
    pub duration_wp: String,
    #[serde(default, rename = "durationTP")]
    pub duration_tp: String,
    #[serde(default)]
    pub gauge_no: String,
    #[serde(default)]
    pub result: PressureResult,
}

/// Outcome of the static pressure test; blank until the test is run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureResult {
    #[default]
    #[serde(rename = "")]
    Pending,
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestingLengthRow {
    #[validate(range(min = 1, message = "Serial number must be at least 1"))]
    pub sl_no: u32,
    #[serde(default)]
    pub tag_no: String,
    #[serde(default)]
    pub gauge_sl_no: String,
    #[serde(default)]
    pub before_without_water: String,
    #[serde(default)]
    pub before_at_10psi: String,
    #[serde(default)]
    pub during_test_l1: String,
    #[serde(default)]
    pub after_test_l2: String,
    #[serde(default)]
    pub elongation_percent: String,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContinuityRow {
    #[validate(range(min = 1, message = "Serial number must be at least 1"))]
    pub sl_no: u32,
    #[serde(default)]
    pub tag_no: String,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub during: String,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionOptions {
    #[serde(default)]
    pub air_purging: bool,
    #[serde(default)]
    pub nitrogen_purging: bool,
    #[serde(default)]
    pub capping: bool,
    #[serde(default)]
    pub blue_gold_cleaning: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinalAcceptance {
    #[serde(default)]
    #[validate]
    pub rows: Vec<FinalAcceptanceRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_qty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_qty: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinalAcceptanceRow {
    #[validate(range(min = 1, message = "Serial number must be at least 1"))]
    pub sl_no: u32,
    #[serde(default)]
    pub tag_no: String,
    #[serde(default)]
    pub hose_bld: String,
    #[serde(default)]
    pub assembly_length: String,
    #[serde(default)]
    pub end_fitting_verification: String,
    #[serde(default)]
    pub identification: String,
    #[serde(default)]
    pub colour_codes: String,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inspector {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
}

impl FinalInspectionReport {
    pub fn passed(&self) -> bool {
        self.static_pressure.result == PressureResult::Passed
    }

    /// Accepted plus rejected quantity, when both were recorded.
    pub fn inspected_qty(&self) -> Option<u32> {
        Some(self.final_acceptance.accepted_qty? + self.final_acceptance.rejected_qty?)
    }
}
