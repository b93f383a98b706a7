use crate::core::TableData;
use crate::pdf::layout::{Banner, Block, Fragment};
use crate::templates::helpers::escape_typst_string;

/// Typst string literal usable in markup position.
fn lit(text: &str) -> String {
    format!("#\"{}\"", escape_typst_string(text))
}

/// Accumulates Typst markup for the document body.
pub struct PdfBuilder {
    sections: Vec<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        PdfBuilder {
            sections: Vec::new(),
        }
    }

    pub fn add_fragment(&mut self, fragment: &Fragment) -> &mut Self {
        self.sections.push(format!("// {}", fragment.name));
        for block in &fragment.blocks {
            self.add_block(block);
        }
        self
    }

    pub fn add_block(&mut self, block: &Block) -> &mut Self {
        match block {
            Block::Banner(banner) => self.add_banner(banner),
            Block::Heading { text, level } => self.add_title(text, *level),
            Block::Table(table) => self.add_table(table),
            Block::Text(text) => self.add_paragraph(text),
            Block::Spacer(pt) => self.add_spacing(*pt),
            Block::Rule => self.add_horizontal_line(),
        }
    }

    pub fn add_title(&mut self, title: &str, level: u8) -> &mut Self {
        self.sections
            .push(format!("#heading(level: {})[{}]", level.max(1), lit(title)));
        self
    }

    pub fn add_paragraph(&mut self, text: &str) -> &mut Self {
        self.sections.push(format!("#block(width: 100%)[{}]", lit(text)));
        self
    }

    pub fn add_spacing(&mut self, pt: f32) -> &mut Self {
        self.sections.push(format!("#v({}pt)", pt));
        self
    }

    pub fn add_horizontal_line(&mut self) -> &mut Self {
        self.sections
            .push("#line(length: 100%, stroke: 0.5pt)".to_string());
        self
    }

    pub fn add_banner(&mut self, banner: &Banner) -> &mut Self {
        let logo = match &banner.logo {
            Some(path) => format!("image(\"{}\", width: 60pt)", escape_typst_string(path)),
            None => "rect(width: 60pt, height: 40pt, stroke: 0.5pt + gray)[]".to_string(),
        };

        let panel = banner
            .panel
            .iter()
            .map(|(label, value)| format!("    #strong[{}] : {}", lit(label), lit(value)))
            .collect::<Vec<_>>()
            .join(" \\\n");

        let mut typst = String::from("#grid(\n");
        typst.push_str("  columns: (1fr, 2fr, 1.6fr),\n");
        typst.push_str("  align: (left + horizon, center + horizon, left + horizon),\n");
        typst.push_str("  gutter: 10pt,\n");
        typst.push_str(&format!("  {},\n", logo));
        typst.push_str(&format!(
            "  text(size: 16pt, weight: \"bold\")[{}],\n",
            lit(&banner.title)
        ));
        typst.push_str("  rect(width: 100%, stroke: 0.5pt, radius: 3pt, inset: 6pt)[\n");
        typst.push_str("    #set text(size: 8pt)\n");
        typst.push_str(&panel);
        typst.push_str("\n  ],\n)");

        self.sections.push(typst);
        self
    }

    /// Label/value table, labels in bold.
    pub fn add_table(&mut self, table: &TableData) -> &mut Self {
        let [label_width, value_width] = table.column_widths;
        let mut typst = String::from("#table(\n");
        typst.push_str(&format!("  columns: ({}fr, {}fr),\n", label_width, value_width));
        typst.push_str("  stroke: 0.5pt + gray,\n");
        typst.push_str("  inset: 6pt,\n");

        for (label, value) in &table.rows {
            typst.push_str(&format!("  [#strong[{}]], [{}],\n", lit(label), lit(value)));
        }

        typst.push(')');
        self.sections.push(typst);
        self
    }

    pub fn build(&self) -> String {
        self.sections.join("\n\n")
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_table_markup() {
        let mut table = TableData::key_value();
        table.add_pair("Client", "Domaine \"Nord\"");
        table.add_pair("Pompe", "P3");

        let mut builder = PdfBuilder::new();
        builder.add_table(&table);
        let out = builder.build();

        assert!(out.starts_with("#table(\n  columns: (1fr, 2fr),"));
        assert!(out.contains("[#strong[#\"Client\"]], [#\"Domaine \\\"Nord\\\"\"],"));
        assert!(out.contains("[#strong[#\"Pompe\"]], [#\"P3\"],"));
        assert!(out.ends_with(')'));
    }

    #[test]
    fn banner_has_three_regions() {
        let banner = Banner {
            logo: None,
            title: "RAPPORT".to_string(),
            panel: vec![("Client".to_string(), "Domaine".to_string())],
        };
        let mut builder = PdfBuilder::new();
        builder.add_banner(&banner);
        let out = builder.build();

        assert!(out.contains("columns: (1fr, 2fr, 1.6fr)"));
        assert!(out.contains("rect(width: 60pt, height: 40pt"));
        assert!(out.contains("#strong[#\"Client\"] : #\"Domaine\""));
    }

    #[test]
    fn fragments_are_rendered_in_order() {
        let mut fragment = Fragment::new("notes");
        fragment
            .push(Block::Heading { text: "Observations".to_string(), level: 2 })
            .push(Block::Text("ligne 1\nligne 2".to_string()));

        let mut builder = PdfBuilder::new();
        builder.add_fragment(&fragment);
        let out = builder.build();

        let heading = out.find("Observations").unwrap();
        let text = out.find("ligne 1\\nligne 2").unwrap();
        assert!(heading < text);
        assert!(out.starts_with("// notes"));
    }
}
