use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::templates::helpers::sanitize_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Assembly,
    Disassembly,
}

impl OperationType {
    pub fn name(&self) -> &'static str {
        match self {
            OperationType::Assembly => "ASSEMBLY",
            OperationType::Disassembly => "DISASSEMBLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationType::Assembly => "montage",
            OperationType::Disassembly => "démontage",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Readings in meters, flow speed in m³/h. Absent and zero are distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurements {
    pub depth: Option<i32>,
    pub static_level: Option<i32>,
    pub dynamic_level: Option<i32>,
    pub pump_shimming: Option<i32>,
    pub flow_speed: Option<f64>,
}

/// Only meaningful on assembly reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssemblyDetails {
    pub engine: Option<String>,
    pub pump: Option<String>,
    pub elements_used: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialRefs {
    pub purchase_request: Option<String>,
    pub quotation: Option<String>,
    pub purchase_order: Option<String>,
    pub invoice: Option<String>,
    pub invoice_date: Option<NaiveDate>,
}

/// One maintenance intervention on a pump.
///
/// Reports reach the document pipeline already validated; nothing here is
/// enforced. In particular `work_finish_date >= request_date` is a caller
/// precondition, see [`Report::finishes_before_request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub execution_order: String,
    pub request_date: NaiveDate,
    pub work_start_date: NaiveDate,
    pub work_finish_date: NaiveDate,
    pub pump_id: i64,
    pub operators: Vec<String>,
    pub created_by: i64,
    pub operation_type: OperationType,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub assembly: AssemblyDetails,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub financial: FinancialRefs,
}

impl Report {
    pub fn is_assembly(&self) -> bool {
        self.operation_type == OperationType::Assembly
    }

    pub fn finishes_before_request(&self) -> bool {
        self.work_finish_date < self.request_date
    }

    pub fn suggested_filename(&self, names: &DisplayNames) -> String {
        format!(
            "rapport-{}-{}.pdf",
            self.id,
            sanitize_filename(&names.client, "client")
        )
    }
}

/// Human-readable names resolved from the report's foreign keys by the
/// storage layer (pump -> farm -> client, and the creating user).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNames {
    pub client: String,
    pub farm: String,
    pub pump: String,
    pub creator: String,
}

impl DisplayNames {
    pub fn new(
        client: impl Into<String>,
        farm: impl Into<String>,
        pump: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        DisplayNames {
            client: client.into(),
            farm: farm.into(),
            pump: pump.into(),
            creator: creator.into(),
        }
    }
}

/// JSON envelope accepted by the `intervention-report` template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub report: Report,
    pub names: DisplayNames,
}
