use serde_json::json;
use std::sync::OnceLock;

use super::{Field, FieldKind, Schema, U32_LIMIT};

pub const LENGTH_UNITS: &[&str] = &["mm", "cm", "m", "ft", "in"];
pub const END_A_FITTINGS: &[&str] = &["", "Adaptor A", "Custom"];
pub const END_B_FITTINGS: &[&str] = &["", "Adaptor B", "Custom"];
pub const MATERIALS: &[&str] = &["CS", "SS", "AL", "BR"];
pub const PIGGING_OPTIONS: &[&str] = &[
    "Before Assembly",
    "After Assembly",
    "Before Testing",
    "After Testing",
    "Final Inspection",
    "Packaging",
];

/// Hose assembly job sheet.
pub fn job_sheet_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "job sheet",
            vec![
                Field::object(
                    "orderDetails",
                    vec![
                        Field::text("customer").required("Customer name is required"),
                        Field::text("flxTagNo").required("FLX Tag No is required"),
                        Field::text("customerTagNo"),
                        Field::text("deliveryDueDate").required("Delivery Due Date is required"),
                        Field::text("reference"),
                    ],
                ),
                Field::object(
                    "jobDetails",
                    vec![
                        Field::text("hoseType").required("Hose type is required"),
                        Field::text("hoseId").required("Hose ID is required"),
                        Field::object(
                            "lengthCut",
                            vec![
                                Field::number("value")
                                    .min(0.0, "Length cut cannot be negative")
                                    .optional(),
                                Field::choice("unit", LENGTH_UNITS).default_value("mm"),
                            ],
                        )
                        .default_value(json!({})),
                        Field::number("quantity")
                            .integer()
                            .min(1.0, "Quantity must be at least 1")
                            .max(U32_LIMIT, "Quantity is too large")
                            .required("Quantity is required"),
                        Field::object(
                            "fittingType",
                            vec![
                                Field::choice("endA", END_A_FITTINGS).default_value(""),
                                Field::choice("endB", END_B_FITTINGS).default_value(""),
                            ],
                        ),
                        Field::list("moc", FieldKind::choice(MATERIALS))
                            .distinct()
                            .min_items(1, "At least one MOC is required")
                            .required("At least one MOC is required"),
                        Field::object(
                            "traceability",
                            vec![
                                Field::text("hoseBatchNumber")
                                    .required("Hose batch number is required"),
                                Field::text("flexifloBatchNo"),
                            ],
                        ),
                    ],
                ),
                Field::object(
                    "inProcessDetails",
                    vec![
                        process_step("hoseCutDetails"),
                        Field::object(
                            "skivingDetails",
                            vec![process_step("internal"), process_step("external")],
                        )
                        .optional(),
                        process_step("assemblyDetails"),
                        process_step("mandralsDetails"),
                        process_step("crimpingDetails"),
                        process_step("weldingDetails"),
                        process_step("punchingTaggingDetails"),
                    ],
                )
                .default_value(json!({})),
                Field::object(
                    "remarks",
                    vec![
                        Field::text("text"),
                        Field::text("weldingRodNumber"),
                        Field::text("weldingRodSize"),
                        Field::list("piggingOptions", FieldKind::choice(PIGGING_OPTIONS)).distinct(),
                    ],
                )
                .default_value(json!({})),
                Field::object(
                    "footer",
                    vec![
                        Field::text("supervisorSignature")
                            .required("Supervisor signature is required"),
                        Field::date("date"),
                    ],
                ),
            ],
        )
    })
}

fn process_step(name: &'static str) -> Field {
    Field::object(
        name,
        vec![
            Field::text("date").untrimmed(),
            Field::text("operatorSign").untrimmed(),
            Field::text("machineNumber").untrimmed(),
            Field::object(
                "measurements",
                vec![
                    Field::number("value").optional(),
                    Field::choice("unit", LENGTH_UNITS).optional(),
                ],
            )
            .optional(),
            Field::text("additionalNotes").untrimmed(),
        ],
    )
    .optional()
}
