use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{DocumentError, DocumentResult, ReportLayout};
use crate::templates::templates::InterventionReportTemplate;

/// A document template producing Typst source from JSON data.
pub trait TypstTemplate: Send + Sync {
    /// Full Typst source for `data`.
    fn generate(&self, data: &Value) -> DocumentResult<String>;

    fn template_id(&self) -> &str;

    /// Checks the shape of `data` before deserialization.
    fn validate(&self, data: &Value) -> DocumentResult<()>;

    fn description(&self) -> &str {
        "Document template"
    }
}

pub struct TemplateRegistry {
    templates: HashMap<String, Arc<dyn TypstTemplate>>,
}

impl TemplateRegistry {
    pub fn new(layout: ReportLayout) -> DocumentResult<Self> {
        Ok(Self::with_intervention(InterventionReportTemplate::new(layout)?))
    }

    fn with_intervention(intervention: InterventionReportTemplate) -> Self {
        let mut templates: HashMap<String, Arc<dyn TypstTemplate>> = HashMap::new();

        let intervention = Arc::new(intervention);
        templates.insert(intervention.template_id().to_string(), intervention);

        Self { templates }
    }

    pub fn get(&self, template_id: &str) -> DocumentResult<Arc<dyn TypstTemplate>> {
        self.templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| DocumentError::TemplateNotFound(template_id.to_string()))
    }

    /// Validate then generate with the named template.
    pub fn render(&self, template_id: &str, data: &Value) -> DocumentResult<String> {
        let template = self.get(template_id)?;
        template.validate(data)?;
        template.generate(data)
    }

    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .templates
            .iter()
            .map(|(id, template)| (id.clone(), template.description().to_string()))
            .collect();
        entries.sort();
        entries
    }

    pub fn exists(&self, template_id: &str) -> bool {
        self.templates.contains_key(template_id)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_intervention(InterventionReportTemplate::default())
    }
}
