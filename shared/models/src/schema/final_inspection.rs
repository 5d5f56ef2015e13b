use std::sync::OnceLock;

use super::{Field, FieldKind, Schema, U32_LIMIT};

pub const PRESSURE_RESULTS: &[&str] = &["", "passed", "failed"];

/// Final inspection report.
///
/// Measurements are recorded as free text exactly as written on the paper
/// form; only the test type and the row serial numbers are mandatory.
pub fn final_inspection_report_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "final inspection report",
            vec![
                Field::object(
                    "staticPressure",
                    vec![
                        Field::text("type").required("Type is required"),
                        Field::text("date").untrimmed(),
                        Field::text("operator"),
                        Field::text("workingPressure"),
                        Field::text("testPressure"),
                        Field::text("durationWP"),
                        Field::text("durationTP"),
                        Field::text("gaugeNo"),
                        Field::choice("result", PRESSURE_RESULTS).default_value(""),
                    ],
                ),
                Field::list(
                    "testingLength",
                    FieldKind::object(vec![
                        serial_number(),
                        Field::text("tagNo"),
                        Field::text("gaugeSlNo"),
                        Field::text("beforeWithoutWater"),
                        Field::text("beforeAt10psi"),
                        Field::text("duringTestL1"),
                        Field::text("afterTestL2"),
                        Field::text("elongationPercent"),
                        Field::text("remarks"),
                    ]),
                ),
                Field::list(
                    "continuity",
                    FieldKind::object(vec![
                        serial_number(),
                        Field::text("tagNo"),
                        Field::text("before"),
                        Field::text("during"),
                        Field::text("after"),
                        Field::text("remarks"),
                    ]),
                ),
                Field::object(
                    "options",
                    vec![
                        Field::boolean("airPurging"),
                        Field::boolean("nitrogenPurging"),
                        Field::boolean("capping"),
                        Field::boolean("blueGoldCleaning"),
                    ],
                ),
                Field::object(
                    "finalAcceptance",
                    vec![
                        Field::list(
                            "rows",
                            FieldKind::object(vec![
                                serial_number(),
                                Field::text("tagNo"),
                                Field::text("hoseBld"),
                                Field::text("assemblyLength"),
                                Field::text("endFittingVerification"),
                                Field::text("identification"),
                                Field::text("colourCodes"),
                                Field::text("remarks"),
                            ]),
                        ),
                        Field::number("acceptedQty")
                            .integer()
                            .min(0.0, "Accepted quantity cannot be negative")
                            .max(U32_LIMIT, "Accepted quantity is too large")
                            .optional(),
                        Field::number("rejectedQty")
                            .integer()
                            .min(0.0, "Rejected quantity cannot be negative")
                            .max(U32_LIMIT, "Rejected quantity is too large")
                            .optional(),
                    ],
                ),
                Field::object(
                    "inspector",
                    vec![Field::text("name"), Field::text("date").untrimmed()],
                ),
            ],
        )
    })
}

fn serial_number() -> Field {
    Field::number("slNo")
        .integer()
        .min(1.0, "Serial number must be at least 1")
        .max(U32_LIMIT, "Serial number is too large")
        .required("Serial number is required")
}
