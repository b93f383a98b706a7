//! Per-page decoration.
//!
//! A decorator yields a Typst content expression which the page setup
//! installs as the page footer. The typesetter evaluates it once for every
//! page it lays out, independently of the body flow, so the footer lands on
//! the first and last page alike without any bookkeeping on our side.

use crate::core::FooterSettings;
use crate::templates::helpers::escape_typst_string;

pub trait PageDecorator: Send + Sync {
    /// Typst expression for the `footer:` page parameter.
    fn footer(&self) -> String;

    /// Text stamped on every page, for inspection.
    fn fixed_text(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterDecorator {
    contact_line: String,
    page_numbers: bool,
}

impl FooterDecorator {
    pub fn new(contact_line: impl Into<String>, page_numbers: bool) -> Self {
        FooterDecorator {
            contact_line: contact_line.into(),
            page_numbers,
        }
    }
}

impl From<&FooterSettings> for FooterDecorator {
    fn from(settings: &FooterSettings) -> Self {
        FooterDecorator::new(settings.contact_line.clone(), settings.page_numbers)
    }
}

impl PageDecorator for FooterDecorator {
    fn footer(&self) -> String {
        let numbering = if self.page_numbers {
            r#"
    #v(2pt)
    #text(size: 7pt, fill: gray)[Page #counter(page).display() / #counter(page).final().first()]"#
        } else {
            ""
        };

        format!(
            r#"context [
  #line(length: 100%, stroke: 0.5pt + gray)
  #align(center)[
    #text(size: 8pt, fill: gray)[#"{}"]{}
  ]
]"#,
            escape_typst_string(&self.contact_line),
            numbering
        )
    }

    fn fixed_text(&self) -> &str {
        &self.contact_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_carries_contact_line() {
        let footer = FooterDecorator::new("Tél : 01 02", false);
        assert!(footer.footer().starts_with("context ["));
        assert!(footer.footer().contains("#\"Tél : 01 02\""));
        assert!(!footer.footer().contains("counter(page)"));
        assert_eq!(footer.fixed_text(), "Tél : 01 02");
    }

    #[test]
    fn footer_page_numbers_are_optional() {
        let footer = FooterDecorator::from(&FooterSettings::default());
        assert!(footer.footer().contains("counter(page).final()"));
    }
}
