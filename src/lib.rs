pub mod core;
pub mod generators;
pub mod models;
pub mod pdf;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{
    AbsentFieldPolicy, DocumentError, DocumentResult, LayoutVariant, ReportLayout, Settings,
};
pub use generators::{AssembledDocument, ReportAssembler};
pub use models::{
    AssemblyDetails, DisplayNames, FinancialRefs, Measurements, OperationType, Report,
    ReportPayload,
};
pub use templates::{TemplateRegistry, TypstTemplate};
