pub mod report;

pub use report::{AssembledDocument, ReportAssembler};
