//! Display formatting for report fields.
//!
//! Everything here is pure: typed values in, display strings out. Absent
//! values never fail, they resolve to a caller-chosen [`Fallback`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{DocumentError, DocumentResult};
use crate::models::OperationType;

pub const SHORT_DATE_FORMAT: &str = "%d/%m/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const FRENCH_MONTHS_ABBR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// `15/07/2025`
    #[default]
    Short,
    /// `15 juil. 2025`
    Long,
}

pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::Short => date.format(SHORT_DATE_FORMAT).to_string(),
        DateStyle::Long => format!(
            "{} {} {}",
            date.day(),
            FRENCH_MONTHS_ABBR[date.month0() as usize],
            date.year()
        ),
    }
}

/// Strict parse of `dd/MM/yyyy` or `yyyy-MM-dd`.
pub fn parse_date(input: &str) -> DocumentResult<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, SHORT_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| DocumentError::InvalidDate {
            input: input.to_string(),
        })
}

/// Blank means "no date". Anything else, including partial dates, goes
/// through [`parse_date`].
pub fn parse_optional_date(input: &str) -> DocumentResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

/// Text shown in place of an absent value. The French labels carry
/// grammatical gender, so the placeholder agrees with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Empty,
    Masculine,
    Feminine,
    Plural,
    Unknown,
}

impl Fallback {
    pub fn text(&self) -> &'static str {
        match self {
            Fallback::Empty => "",
            Fallback::Masculine => "Aucun",
            Fallback::Feminine => "Aucune",
            Fallback::Plural => "Aucuns",
            Fallback::Unknown => "Inconnu",
        }
    }
}

pub fn format_measurement(value: Option<i32>, unit: &str, fallback: Fallback) -> String {
    match value {
        Some(v) => with_unit(v.to_string(), unit),
        None => fallback.text().to_string(),
    }
}

pub fn format_decimal_measurement(value: Option<f64>, unit: &str, fallback: Fallback) -> String {
    match value {
        Some(v) => with_unit(format_decimal(v), unit),
        None => fallback.text().to_string(),
    }
}

fn with_unit(value: String, unit: &str) -> String {
    if unit.is_empty() {
        value
    } else {
        format!("{} {}", value, unit)
    }
}

/// French decimal comma, at most two fractional digits, no trailing zeros.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        _ => trimmed.replace('.', ","),
    }
}

pub fn format_text(value: Option<&str>, fallback: Fallback) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.text().to_string(),
    }
}

pub fn format_operators(operators: &[String]) -> String {
    operators.join(" - ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationLabel {
    Raw,
    Localized,
}

pub fn format_operation_type(operation: OperationType, label: OperationLabel) -> String {
    match label {
        OperationLabel::Raw => operation.name().to_string(),
        OperationLabel::Localized => operation.label().to_string(),
    }
}

/// `"<invoice> le <date>"`, with `Inconnu` standing in for a missing date.
pub fn format_invoice(invoice: Option<&str>, date: Option<NaiveDate>) -> String {
    let number = format_text(invoice, Fallback::Feminine);
    let date = date
        .map(|d| format_date(d, DateStyle::Short))
        .unwrap_or_else(|| Fallback::Unknown.text().to_string());
    format!("{} le {}", number, date)
}

/// Splits the free-text elements list into items, dropping leading bullet
/// markers and blank lines.
pub fn split_elements(text: &str) -> Vec<String> {
    const BULLETS: &[char] = &['-', '*', '•', '·', '–', '—', '+'];

    text.lines()
        .map(|line| line.trim_start().trim_start_matches(BULLETS).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape a value for use inside a Typst string literal.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Lowercase ASCII slug for file names.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-').to_string();
    if result.is_empty() {
        fallback.to_string()
    } else {
        result
    }
}
