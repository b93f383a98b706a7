use crate::core::TableData;

/// Three-region title banner: logo slot, centered title, boxed info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub logo: Option<String>,
    pub title: String,
    pub panel: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Banner(Banner),
    Heading { text: String, level: u8 },
    Table(TableData),
    Text(String),
    Spacer(f32), // pt
    Rule,
}

impl Block {
    fn push_text(&self, out: &mut Vec<String>) {
        match self {
            Block::Banner(banner) => {
                out.push(banner.title.clone());
                for (label, value) in &banner.panel {
                    out.push(format!("{} : {}", label, value));
                }
            }
            Block::Heading { text, .. } | Block::Text(text) => out.push(text.clone()),
            Block::Table(table) => {
                for (label, value) in &table.rows {
                    out.push(format!("{} : {}", label, value));
                }
            }
            Block::Spacer(_) | Block::Rule => {}
        }
    }
}

/// Ordered blocks produced by one section builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: &'static str,
    pub blocks: Vec<Block>,
}

impl Fragment {
    pub fn new(name: &'static str) -> Self {
        Fragment {
            name,
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableData> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// All visible text, one line per cell row or block.
    pub fn text_content(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            block.push_text(&mut lines);
        }
        lines.join("\n")
    }
}
