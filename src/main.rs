use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pump_report::templates::{parse_payload, validate_payload, TEMPLATE_ID};
use pump_report::{ReportAssembler, ReportPayload, Settings, TemplateRegistry};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pump-report", about = "Intervention report PDF generator")]
struct Cli {
    /// Settings file (defaults to ./pump-report.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a report payload to PDF
    Render {
        payload: PathBuf,
        /// Output file; defaults to a name derived from the report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the generated Typst source
    Source { payload: PathBuf },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    match cli.command {
        Command::Render { payload, output } => {
            let data = read_payload(&payload)?;
            validate_payload(&data)?;
            let ReportPayload { report, names } = parse_payload(&data)?;
            let output = output.unwrap_or_else(|| PathBuf::from(report.suggested_filename(&names)));

            let assembler = ReportAssembler::from_settings(&settings)?;
            let document = assembler
                .assemble_to_path(&report, &names, &output)
                .with_context(|| format!("generating {}", output.display()))?;

            tracing::info!(
                path = %output.display(),
                pages = document.page_count,
                "done"
            );
        }
        Command::Source { payload } => {
            let data = read_payload(&payload)?;
            let registry = TemplateRegistry::new(settings.layout)?;
            print!("{}", registry.render(TEMPLATE_ID, &data)?);
        }
    }

    Ok(())
}

fn read_payload(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading payload {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing payload {}", path.display()))
}
