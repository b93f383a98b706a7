//! Section builders for the intervention report.
//!
//! Each builder is a pure function of the report, its resolved display
//! names and the layout settings. [`build_all`] returns them in page order.

use crate::core::{AbsentFieldPolicy, ReportLayout, TableData};
use crate::models::{DisplayNames, Report};
use crate::pdf::layout::{Banner, Block, Fragment};
use crate::templates::helpers::{
    format_date, format_decimal_measurement, format_invoice, format_measurement,
    format_operation_type, format_operators, format_text, split_elements, DateStyle, Fallback,
    OperationLabel,
};

pub const REPORT_TITLE: &str = "RAPPORT D'INTERVENTION";

pub mod labels {
    pub const EXECUTION_ORDER: &str = "Ordre d'exécution";
    pub const REQUEST_DATE: &str = "Date de demande";
    pub const WORK_START_DATE: &str = "Début des travaux";
    pub const WORK_FINISH_DATE: &str = "Fin des travaux";
    pub const CLIENT: &str = "Client";
    pub const CREATOR: &str = "Établi par";
    pub const FARM: &str = "Installation";
    pub const PUMP: &str = "Pompe";
    pub const OPERATION_TYPE: &str = "Type d'opération";
    pub const OPERATORS: &str = "Opérateurs";

    pub const PURCHASE_REQUEST: &str = "Demande d'achat";
    pub const PURCHASE_ORDER: &str = "Bon de commande";
    pub const QUOTATION: &str = "Devis";
    pub const INVOICE: &str = "Facture";

    pub const DEPTH: &str = "Profondeur";
    pub const STATIC_LEVEL: &str = "Niveau statique";
    pub const DYNAMIC_LEVEL: &str = "Niveau dynamique";
    pub const PUMP_SHIMMING: &str = "Calage de la pompe";
    pub const FLOW_SPEED: &str = "Débit";
    pub const ENGINE: &str = "Moteur";
    pub const PUMP_DESCRIPTION: &str = "Pompe installée";
    pub const ELEMENTS_USED: &str = "Éléments utilisés";

    pub const GENERAL_HEADING: &str = "Informations générales";
    pub const FINANCIAL_HEADING: &str = "Informations financières";
    pub const TECHNICAL_HEADING: &str = "Informations techniques";
    pub const NOTES_HEADING: &str = "Observations";
}

const METERS: &str = "m";
const CUBIC_METERS_PER_HOUR: &str = "m³/h";

pub fn header(report: &Report, names: &DisplayNames, layout: &ReportLayout) -> Fragment {
    let style = layout.header_date_style;
    let panel = vec![
        (labels::EXECUTION_ORDER, report.execution_order.clone()),
        (labels::REQUEST_DATE, format_date(report.request_date, style)),
        (labels::WORK_FINISH_DATE, format_date(report.work_finish_date, style)),
        (labels::CLIENT, names.client.clone()),
        (labels::CREATOR, names.creator.clone()),
    ];

    let mut fragment = Fragment::new("header");
    fragment
        .push(Block::Banner(Banner {
            logo: layout
                .logo_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            title: REPORT_TITLE.to_string(),
            panel: panel
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        }))
        .push(Block::Spacer(8.0))
        .push(Block::Rule);
    fragment
}

pub fn general_info(report: &Report, names: &DisplayNames, _layout: &ReportLayout) -> Fragment {
    let mut table = TableData::key_value();
    table.add_pair(labels::CLIENT, names.client.as_str());
    table.add_pair(labels::FARM, names.farm.as_str());
    table.add_pair(labels::PUMP, names.pump.as_str());
    table.add_pair(labels::EXECUTION_ORDER, report.execution_order.as_str());
    table.add_pair(
        labels::OPERATION_TYPE,
        format_operation_type(report.operation_type, OperationLabel::Localized),
    );
    table.add_pair(labels::OPERATORS, format_operators(&report.operators));
    table.add_pair(
        labels::REQUEST_DATE,
        format_date(report.request_date, DateStyle::Short),
    );
    table.add_pair(
        labels::WORK_START_DATE,
        format_date(report.work_start_date, DateStyle::Short),
    );
    table.add_pair(
        labels::WORK_FINISH_DATE,
        format_date(report.work_finish_date, DateStyle::Short),
    );

    titled("general_info", labels::GENERAL_HEADING, table)
}

pub fn financial_info(report: &Report, _names: &DisplayNames, _layout: &ReportLayout) -> Fragment {
    let refs = &report.financial;
    let mut table = TableData::key_value();
    table.add_pair(
        labels::PURCHASE_REQUEST,
        format_text(refs.purchase_request.as_deref(), Fallback::Feminine),
    );
    table.add_pair(
        labels::PURCHASE_ORDER,
        format_text(refs.purchase_order.as_deref(), Fallback::Masculine),
    );
    table.add_pair(
        labels::QUOTATION,
        format_text(refs.quotation.as_deref(), Fallback::Masculine),
    );
    table.add_pair(
        labels::INVOICE,
        format_invoice(refs.invoice.as_deref(), refs.invoice_date),
    );

    titled("financial_info", labels::FINANCIAL_HEADING, table)
}

pub fn technical_info(report: &Report, _names: &DisplayNames, layout: &ReportLayout) -> Fragment {
    let m = &report.measurements;
    let mut table = TableData::key_value();
    table.add_pair(labels::DEPTH, format_measurement(m.depth, METERS, Fallback::Feminine));
    table.add_pair(
        labels::STATIC_LEVEL,
        format_measurement(m.static_level, METERS, Fallback::Masculine),
    );
    table.add_pair(
        labels::DYNAMIC_LEVEL,
        format_measurement(m.dynamic_level, METERS, Fallback::Masculine),
    );
    table.add_pair(
        labels::PUMP_SHIMMING,
        format_measurement(m.pump_shimming, METERS, Fallback::Masculine),
    );
    table.add_pair(
        labels::FLOW_SPEED,
        format_decimal_measurement(m.flow_speed, CUBIC_METERS_PER_HOUR, Fallback::Masculine),
    );

    if report.is_assembly() {
        let details = &report.assembly;
        let elements = details
            .elements_used
            .as_deref()
            .map(split_elements)
            .filter(|items| !items.is_empty())
            .map(|items| items.join("\n"));

        let optional_rows = [
            (labels::ENGINE, non_blank(details.engine.as_deref()), Fallback::Masculine),
            (labels::PUMP_DESCRIPTION, non_blank(details.pump.as_deref()), Fallback::Feminine),
            (labels::ELEMENTS_USED, elements, Fallback::Plural),
        ];

        for (label, value, fallback) in optional_rows {
            match (value, layout.absent_fields) {
                (Some(value), _) => table.add_pair(label, value),
                (None, AbsentFieldPolicy::Placeholder) => table.add_pair(label, fallback.text()),
                (None, AbsentFieldPolicy::Omit) => {}
            }
        }
    }

    titled("technical_info", labels::TECHNICAL_HEADING, table)
}

pub fn notes(report: &Report, _names: &DisplayNames, _layout: &ReportLayout) -> Fragment {
    let mut fragment = Fragment::new("notes");
    fragment
        .push(Block::Spacer(10.0))
        .push(Block::Heading {
            text: labels::NOTES_HEADING.to_string(),
            level: 2,
        })
        .push(Block::Text(
            report
                .notes
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| Fallback::Feminine.text().to_string()),
        ));
    fragment
}

pub type SectionBuilder = fn(&Report, &DisplayNames, &ReportLayout) -> Fragment;

/// Page order of the body. The footer is not a section, it is installed as
/// a page decoration.
pub const SECTIONS: [SectionBuilder; 5] = [header, general_info, financial_info, technical_info, notes];

pub fn build_all(report: &Report, names: &DisplayNames, layout: &ReportLayout) -> Vec<Fragment> {
    SECTIONS
        .iter()
        .map(|build| build(report, names, layout))
        .collect()
}

fn titled(name: &'static str, heading: &str, table: TableData) -> Fragment {
    let mut fragment = Fragment::new(name);
    fragment
        .push(Block::Spacer(10.0))
        .push(Block::Heading {
            text: heading.to_string(),
            level: 2,
        })
        .push(Block::Table(table));
    fragment
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
