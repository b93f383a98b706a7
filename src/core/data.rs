/// Two-column label/value table. Labels render in bold.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub column_widths: [f32; 2], // fractions
    pub rows: Vec<(String, String)>,
}

impl TableData {
    pub fn key_value() -> Self {
        TableData {
            column_widths: [1.0, 2.0],
            rows: Vec::new(),
        }
    }

    pub fn add_pair(&mut self, label: &str, value: impl Into<String>) {
        self.rows.push((label.to_string(), value.into()));
    }

    /// Value of the first row labelled `label`.
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_label, _)| row_label == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(label, _)| label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata {
            title: "Rapport d'intervention".to_string(),
            author: "Maintenance Pompes".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_lookup() {
        let mut table = TableData::key_value();
        table.add_pair("Client", "Domaine des Oliviers");
        table.add_pair("Pompe", "Grundfos SP 17");

        assert_eq!(table.value_of("Pompe"), Some("Grundfos SP 17"));
        assert_eq!(table.value_of("Moteur"), None);
        assert_eq!(table.labels().collect::<Vec<_>>(), vec!["Client", "Pompe"]);
    }
}
