pub mod helpers;
pub mod sections;
pub mod template_trait;
pub mod templates;

pub use template_trait::{TemplateRegistry, TypstTemplate};
pub use templates::{parse_payload, validate_payload, InterventionReportTemplate, TEMPLATE_ID};
