#![allow(dead_code)]

use chrono::NaiveDate;
use pump_report::{
    AssemblyDetails, DisplayNames, FinancialRefs, Measurements, OperationType, Report,
    ReportAssembler, ReportLayout,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn assembly_report() -> Report {
    Report {
        id: 1001,
        execution_order: "OE-2025-042".to_string(),
        request_date: date(2025, 7, 15),
        work_start_date: date(2025, 7, 20),
        work_finish_date: date(2025, 7, 21),
        pump_id: 18,
        operators: vec!["John Doe".to_string(), "Jane Smith".to_string()],
        created_by: 2,
        operation_type: OperationType::Assembly,
        measurements: Measurements {
            depth: Some(150),
            static_level: Some(40),
            dynamic_level: Some(0),
            pump_shimming: None,
            flow_speed: Some(9.75),
        },
        assembly: AssemblyDetails {
            engine: Some("Moteur Franklin 11 kW".to_string()),
            pump: Some("Pompe Caprari E6XP35".to_string()),
            elements_used: Some("Câble 4x10 mm²\nColonne galvanisée 3 pouces".to_string()),
        },
        notes: Some("Forage nettoyé avant remontage.".to_string()),
        financial: FinancialRefs {
            purchase_request: Some("DA-2025-17".to_string()),
            quotation: Some("DEV-880".to_string()),
            purchase_order: Some("BC-4410".to_string()),
            invoice: Some("INV-778899".to_string()),
            invoice_date: None,
        },
    }
}

pub fn disassembly_report() -> Report {
    Report {
        operation_type: OperationType::Disassembly,
        ..assembly_report()
    }
}

pub fn names() -> DisplayNames {
    DisplayNames::new("Coopérative El Amel", "Ferme des Palmiers", "Puits P3", "Samira K.")
}

/// Assembler for tests that need a real compile. Those tests are ignored by
/// default; run them with `cargo test -- --ignored` where typst is installed.
pub fn compiling_assembler(layout: ReportLayout) -> ReportAssembler {
    let assembler = ReportAssembler::new(layout).unwrap();
    assert!(
        assembler.generator().compiler_available(),
        "typst not found on PATH"
    );
    assembler
}
