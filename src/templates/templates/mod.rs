mod intervention;

pub use intervention::{parse_payload, validate_payload, InterventionReportTemplate, TEMPLATE_ID};
