//! Hose assembly job sheet.
//!
//! Mirrors the paper job sheet section by section: order details, job
//! details, the in-process log, remarks and the supervisor sign-off.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::schema::is_valid_form_date;

/// One manufacturing job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobSheet {
    #[validate]
    pub order_details: OrderDetails,
    #[validate]
    pub job_details: JobDetails,
    #[serde(default)]
    pub in_process_details: InProcessDetails,
    #[serde(default)]
    pub remarks: Remarks,
    #[validate]
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer: String,
    #[validate(length(min = 1, message = "FLX Tag No is required"))]
    pub flx_tag_no: String,
    #[serde(default)]
    pub customer_tag_no: String,
    #[validate(length(min = 1, message = "Delivery Due Date is required"))]
    pub delivery_due_date: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[validate(length(min = 1, message = "Hose type is required"))]
    pub hose_type: String,
    #[validate(length(min = 1, message = "Hose ID is required"))]
    pub hose_id: String,
    #[serde(default)]
    #[validate]
    pub length_cut: LengthCut,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    pub fitting_type: FittingType,
    #[validate(length(min = 1, message = "At least one MOC is required"))]
    pub moc: Vec<Material>,
    #[validate]
    pub traceability: Traceability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct LengthCut {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Length cut cannot be negative"))]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    M,
    Ft,
    In,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FittingType {
    #[serde(default)]
    pub end_a: FittingEnd,
    #[serde(default)]
    pub end_b: FittingEnd,
}

/// End fitting. Which adaptor is allowed depends on the end; the schema
/// enforces `Adaptor A` on end A and `Adaptor B` on end B.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FittingEnd {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "Adaptor A")]
    AdaptorA,
    #[serde(rename = "Adaptor B")]
    AdaptorB,
    Custom,
}

/// Material of construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Material {
    Cs,
    Ss,
    Al,
    Br,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Traceability {
    #[validate(length(min = 1, message = "Hose batch number is required"))]
    pub hose_batch_number: String,
    #[serde(default)]
    pub flexiflo_batch_no: String,
}

/// Log of the in-process steps. Steps that were not performed are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InProcessDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hose_cut_details: Option<ProcessDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skiving_details: Option<SkivingDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_details: Option<ProcessDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandrals_details: Option<ProcessDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crimping_details: Option<ProcessDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welding_details: Option<ProcessDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punching_tagging_details: Option<ProcessDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkivingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<ProcessDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ProcessDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDetail {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub operator_sign: String,
    #[serde(default)]
    pub machine_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Measurement>,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LengthUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remarks {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub welding_rod_number: String,
    #[serde(default)]
    pub welding_rod_size: String,
    #[serde(default)]
    pub pigging_options: Vec<PiggingOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PiggingOption {
    #[serde(rename = "Before Assembly")]
    BeforeAssembly,
    #[serde(rename = "After Assembly")]
    AfterAssembly,
    #[serde(rename = "Before Testing")]
    BeforeTesting,
    #[serde(rename = "After Testing")]
    AfterTesting,
    #[serde(rename = "Final Inspection")]
    FinalInspection,
    Packaging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    #[validate(length(min = 1, message = "Supervisor signature is required"))]
    pub supervisor_signature: String,
    #[validate(custom = "validate_form_date")]
    pub date: String,
}

fn validate_form_date(date: &str) -> Result<(), ValidationError> {
    if is_valid_form_date(date) {
        Ok(())
    } else {
        let mut error = ValidationError::new("date");
        error.message = Some("Invalid date format".into());
        Err(error)
    }
}

impl JobSheet {
    /// Whether the sheet records the given material.
    pub fn uses_material(&self, material: Material) -> bool {
        self.job_details.moc.contains(&material)
    }
}
