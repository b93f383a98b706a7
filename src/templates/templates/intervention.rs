use serde_json::Value;

use crate::core::{DocumentError, DocumentResult, ReportLayout};
use crate::generators::ReportAssembler;
use crate::models::ReportPayload;
use crate::templates::helpers::{parse_date, parse_optional_date};
use crate::templates::template_trait::TypstTemplate;

pub const TEMPLATE_ID: &str = "intervention-report";

const REQUIRED_REPORT_FIELDS: [&str; 9] = [
    "id",
    "executionOrder",
    "requestDate",
    "workStartDate",
    "workFinishDate",
    "pumpId",
    "operators",
    "createdBy",
    "operationType",
];
const REQUIRED_NAMES: [&str; 4] = ["client", "farm", "pump", "creator"];
const DATE_FIELDS: [&str; 3] = ["requestDate", "workStartDate", "workFinishDate"];

/// Dates may arrive as `dd/MM/yyyy` from form input; rewrite them to ISO
/// so serde can take over. A blank invoice date becomes null.
fn normalize_dates(data: &Value) -> DocumentResult<Value> {
    let mut data = data.clone();
    let Some(report) = data.get_mut("report").and_then(Value::as_object_mut) else {
        return Ok(data);
    };

    for field in DATE_FIELDS {
        if let Some(Value::String(raw)) = report.get(field) {
            let date = parse_date(raw)?;
            report.insert(field.to_string(), Value::String(date.to_string()));
        }
    }

    if let Some(financial) = report.get_mut("financial").and_then(Value::as_object_mut) {
        if let Some(Value::String(raw)) = financial.get("invoiceDate") {
            let normalized = match parse_optional_date(raw)? {
                Some(date) => Value::String(date.to_string()),
                None => Value::Null,
            };
            financial.insert("invoiceDate".to_string(), normalized);
        }
    }

    Ok(data)
}

/// Normalize form dates and deserialize into a [`ReportPayload`].
pub fn parse_payload(data: &Value) -> DocumentResult<ReportPayload> {
    let normalized = normalize_dates(data)?;
    Ok(serde_json::from_value(normalized)?)
}

/// Shape checks run before deserialization, so errors name the JSON field.
pub fn validate_payload(data: &Value) -> DocumentResult<()> {
    let obj = data
        .as_object()
        .ok_or_else(|| DocumentError::Validation("payload must be a JSON object".to_string()))?;

    let report = obj
        .get("report")
        .and_then(Value::as_object)
        .ok_or_else(|| DocumentError::Validation("missing object: report".to_string()))?;
    for field in REQUIRED_REPORT_FIELDS {
        if !report.contains_key(field) {
            return Err(DocumentError::Validation(format!(
                "missing required field: report.{}",
                field
            )));
        }
    }

    let has_operators = report
        .get("operators")
        .and_then(Value::as_array)
        .is_some_and(|ops| !ops.is_empty());
    if !has_operators {
        return Err(DocumentError::Validation(
            "report.operators must list at least one operator".to_string(),
        ));
    }

    let names = obj
        .get("names")
        .and_then(Value::as_object)
        .ok_or_else(|| DocumentError::Validation("missing object: names".to_string()))?;
    for field in REQUIRED_NAMES {
        if !names.get(field).is_some_and(Value::is_string) {
            return Err(DocumentError::Validation(format!(
                "missing required field: names.{}",
                field
            )));
        }
    }

    Ok(())
}

#[derive(Default)]
pub struct InterventionReportTemplate {
    assembler: ReportAssembler,
}

impl InterventionReportTemplate {
    pub fn new(layout: ReportLayout) -> DocumentResult<Self> {
        Ok(Self {
            assembler: ReportAssembler::new(layout)?,
        })
    }
}

impl TypstTemplate for InterventionReportTemplate {
    fn generate(&self, data: &Value) -> DocumentResult<String> {
        let payload = parse_payload(data)?;
        Ok(self.assembler.render_source(&payload.report, &payload.names))
    }

    fn template_id(&self) -> &str {
        TEMPLATE_ID
    }

    fn validate(&self, data: &Value) -> DocumentResult<()> {
        validate_payload(data)
    }

    fn description(&self) -> &str {
        "Rapport d'intervention (montage / démontage de pompe)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "report": {
                "id": 12,
                "executionOrder": "OE-77",
                "requestDate": "15/07/2025",
                "workStartDate": "2025-07-16",
                "workFinishDate": "16/07/2025",
                "pumpId": 3,
                "operators": ["John Doe", "Jane Smith"],
                "createdBy": 1,
                "operationType": "DISASSEMBLY",
                "financial": { "invoice": "INV-778899", "invoiceDate": "" }
            },
            "names": {
                "client": "Domaine des Oliviers",
                "farm": "Ferme Nord",
                "pump": "Forage F2",
                "creator": "Karim B."
            }
        })
    }

    #[test]
    fn accepts_form_dates_and_blank_invoice_date() {
        let parsed = parse_payload(&payload()).unwrap();
        assert_eq!(parsed.report.request_date.to_string(), "2025-07-15");
        assert_eq!(parsed.report.financial.invoice_date, None);
    }

    #[test]
    fn generates_source_with_formatted_fields() {
        let template = InterventionReportTemplate::default();
        template.validate(&payload()).unwrap();
        let source = template.generate(&payload()).unwrap();
        assert!(source.contains("John Doe - Jane Smith"));
        assert!(source.contains("15/07/2025"));
        assert!(source.contains("INV-778899 le Inconnu"));
    }

    #[test]
    fn partial_dates_are_rejected() {
        let mut data = payload();
        data["report"]["requestDate"] = json!("15/07");
        let template = InterventionReportTemplate::default();
        assert!(matches!(
            template.generate(&data),
            Err(DocumentError::InvalidDate { .. })
        ));
    }

    #[test]
    fn validation_reports_missing_fields() {
        let template = InterventionReportTemplate::default();

        let mut data = payload();
        data["report"].as_object_mut().unwrap().remove("executionOrder");
        let err = template.validate(&data).unwrap_err();
        assert!(err.to_string().contains("report.executionOrder"));

        let mut data = payload();
        data["report"]["operators"] = json!([]);
        assert!(template.validate(&data).is_err());

        let mut data = payload();
        data["names"].as_object_mut().unwrap().remove("creator");
        assert!(template.validate(&data).unwrap_err().to_string().contains("names.creator"));

        assert!(template.validate(&json!([1, 2])).is_err());
    }
}
