use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tempfile::{NamedTempFile, TempDir};

use crate::core::{DocumentError, DocumentMetadata, DocumentResult, PdfConfig};
use crate::pdf::decoration::PageDecorator;

const MAIN_FILE: &str = "main.typ";
const OUTPUT_FILE: &str = "output.pdf";

/// Compiles Typst markup to PDF with the external `typst` compiler.
pub struct PdfGenerator {
    config: PdfConfig,
    typst_binary: String,
    temp_dir: Option<PathBuf>,
}

impl PdfGenerator {
    pub fn new(config: PdfConfig) -> Self {
        PdfGenerator {
            config,
            typst_binary: "typst".to_string(),
            temp_dir: None,
        }
    }

    pub fn with_typst_binary(mut self, binary: impl Into<String>) -> Self {
        self.typst_binary = binary.into();
        self
    }

    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    pub fn generate_typst_document(
        &self,
        metadata: &DocumentMetadata,
        decorator: &dyn PageDecorator,
        body_content: &str,
    ) -> String {
        format!(
            "{}\n\n{}\n",
            self.config
                .to_typst_header(&metadata.title, &metadata.author, decorator),
            body_content
        )
    }

    fn workspace(&self) -> DocumentResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pump-report-");
        let dir = match &self.temp_dir {
            Some(base) => {
                fs::create_dir_all(base)?;
                builder.tempdir_in(base)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    /// Compile a complete Typst document. The scratch directory is removed
    /// when this returns, whatever the outcome.
    pub fn compile(&self, typst_source: &str) -> DocumentResult<Vec<u8>> {
        if typst_source.trim().is_empty() {
            return Err(DocumentError::Validation(
                "document content is empty".to_string(),
            ));
        }

        let workspace = self.workspace()?;
        let typ_path = workspace.path().join(MAIN_FILE);
        let pdf_path = workspace.path().join(OUTPUT_FILE);
        fs::write(&typ_path, typst_source)?;

        let started = Instant::now();
        let output = Command::new(&self.typst_binary)
            .arg("compile")
            .arg("--root")
            .arg("/")
            .arg(&typ_path)
            .arg(&pdf_path)
            .current_dir(workspace.path())
            .output()
            .map_err(|source| DocumentError::CompilerLaunch {
                binary: self.typst_binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(code = ?output.status.code(), %stderr, "typst compilation failed");
            return Err(DocumentError::Compilation(stderr));
        }

        let pdf = fs::read(&pdf_path)?;
        tracing::debug!(
            bytes = pdf.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "typst compilation finished"
        );
        Ok(pdf)
    }

    /// Whether the configured compiler can be launched at all.
    pub fn compiler_available(&self) -> bool {
        Command::new(&self.typst_binary)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Copy finished bytes into a caller-owned sink and flush it.
pub fn write_to_sink<W: Write>(pdf: &[u8], sink: &mut W) -> DocumentResult<()> {
    sink.write_all(pdf)?;
    sink.flush()?;
    Ok(())
}

/// Write through a temporary file in the destination directory, then rename
/// over `path`. On failure the destination is left untouched and the
/// temporary file is removed.
pub fn write_atomically(pdf: &[u8], path: &Path) -> DocumentResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(pdf)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

pub fn page_count(pdf: &[u8]) -> DocumentResult<usize> {
    let document = lopdf::Document::load_mem(pdf)?;
    Ok(document.get_pages().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::decoration::FooterDecorator;

    #[test]
    fn document_starts_with_page_setup() {
        let generator = PdfGenerator::new(PdfConfig::default());
        let footer = FooterDecorator::new("Contact", false);
        let doc = generator.generate_typst_document(&DocumentMetadata::default(), &footer, "#\"corps\"");

        let setup = doc.find("#set page(").unwrap();
        let body = doc.find("#\"corps\"").unwrap();
        assert!(setup < body);
    }

    #[test]
    fn empty_source_is_rejected() {
        let generator = PdfGenerator::new(PdfConfig::default());
        assert!(matches!(
            generator.compile("  \n"),
            Err(DocumentError::Validation(_))
        ));
    }

    #[test]
    fn missing_compiler_is_a_launch_error() {
        let generator = PdfGenerator::new(PdfConfig::default())
            .with_typst_binary("/nonexistent/typst-binary");
        assert!(!generator.compiler_available());
        assert!(matches!(
            generator.compile("Bonjour"),
            Err(DocumentError::CompilerLaunch { .. })
        ));
    }

    #[test]
    fn atomic_write_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rapport.pdf");
        fs::write(&path, b"old").unwrap();

        write_atomically(b"%PDF-new", &path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"%PDF-new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn atomic_write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("rapport.pdf");
        assert!(matches!(
            write_atomically(b"%PDF", &path),
            Err(DocumentError::Io(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        assert!(matches!(
            page_count(b"not a pdf"),
            Err(DocumentError::MalformedOutput(_))
        ));
    }
}
