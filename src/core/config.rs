use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{DocumentError, DocumentResult};
use crate::pdf::decoration::PageDecorator;
use crate::templates::helpers::{escape_typst_string, DateStyle};

pub const DEFAULT_COMPANY_LINE: &str =
    "Maintenance Pompes & Forages - Tél : +33 4 00 00 00 00 - contact@maintenance-pompes.fr";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Mm,
    Pt,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Mm => write!(f, "mm"),
            LengthUnit::Pt => write!(f, "pt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub unit: LengthUnit,
}

impl Default for Margin {
    fn default() -> Self {
        Margin::uniform(20.0, LengthUnit::Mm)
    }
}

impl Margin {
    pub fn uniform(size: f32, unit: LengthUnit) -> Self {
        Margin {
            top: size,
            bottom: size,
            left: size,
            right: size,
            unit,
        }
    }

    pub fn to_typst(&self) -> String {
        let u = self.unit;
        format!(
            "(top: {}{u}, bottom: {}{u}, left: {}{u}, right: {}{u})",
            self.top, self.bottom, self.left, self.right
        )
    }
}

/// Page geometry and base typography of a generated document. Paper is
/// always A4 portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    pub margin: Margin,
    pub font_family: String,
    pub font_size: f32,
    pub leading: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        PdfConfig {
            margin: Margin::default(),
            font_family: "Libertinus Serif".to_string(),
            font_size: 10.0,
            leading: 0.65,
        }
    }
}

impl PdfConfig {
    /// Document preamble. The page decorator is installed here, ahead of any
    /// content, so the engine applies it to the first page too.
    pub fn to_typst_header(&self, title: &str, author: &str, decorator: &dyn PageDecorator) -> String {
        format!(
            r#"#set document(title: "{}", author: "{}", date: none)
#set page(
  paper: "a4",
  margin: {},
  footer: {}
)
#set text(
  font: "{}",
  size: {}pt,
  lang: "fr"
)
#set par(leading: {}em)"#,
            escape_typst_string(title),
            escape_typst_string(author),
            self.margin.to_typst(),
            decorator.footer(),
            escape_typst_string(&self.font_family),
            self.font_size,
            self.leading
        )
    }
}

/// Which of the historical report layouts to reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// A4, 20mm margins.
    #[default]
    Standard,
    /// A4, 30pt margins.
    Compact,
}

impl LayoutVariant {
    pub fn pdf_config(&self) -> PdfConfig {
        match self {
            LayoutVariant::Standard => PdfConfig::default(),
            LayoutVariant::Compact => PdfConfig {
                margin: Margin::uniform(30.0, LengthUnit::Pt),
                ..PdfConfig::default()
            },
        }
    }
}

/// How engine, pump and elements are shown on an assembly report when the
/// value is missing. Applied identically to all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentFieldPolicy {
    #[default]
    Omit,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterSettings {
    pub contact_line: String,
    pub page_numbers: bool,
}

impl Default for FooterSettings {
    fn default() -> Self {
        FooterSettings {
            contact_line: DEFAULT_COMPANY_LINE.to_string(),
            page_numbers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    pub variant: LayoutVariant,
    pub absent_fields: AbsentFieldPolicy,
    pub header_date_style: DateStyle,
    pub logo_path: Option<PathBuf>,
    pub footer: FooterSettings,
}

impl Default for ReportLayout {
    fn default() -> Self {
        ReportLayout {
            variant: LayoutVariant::Standard,
            absent_fields: AbsentFieldPolicy::Omit,
            header_date_style: DateStyle::Short,
            logo_path: None,
            footer: FooterSettings::default(),
        }
    }
}

impl ReportLayout {
    /// Make `logo_path` absolute. The compiler runs in a scratch directory,
    /// so a relative path would not resolve there.
    pub fn resolve_paths(mut self) -> DocumentResult<Self> {
        if let Some(logo) = self.logo_path.take() {
            let resolved = std::fs::canonicalize(&logo).map_err(|source| {
                DocumentError::Io(std::io::Error::new(
                    source.kind(),
                    format!("logo {}: {}", logo.display(), source),
                ))
            })?;
            self.logo_path = Some(resolved);
        }
        Ok(self)
    }
}

/// Process-level settings: built-in defaults, then an optional TOML file,
/// then `PUMP_REPORT__*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub typst_binary: String,
    pub temp_dir: Option<PathBuf>,
    pub layout: ReportLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            typst_binary: "typst".to_string(),
            temp_dir: None,
            layout: ReportLayout::default(),
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "pump-report.toml";
    pub const ENV_PREFIX: &'static str = "PUMP_REPORT";

    pub fn load(file: Option<&Path>) -> DocumentResult<Self> {
        let file = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(Self::FILE_NAME));

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(file).required(false))
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }
}
