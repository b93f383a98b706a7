use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::core::{DocumentError, DocumentMetadata, DocumentResult, ReportLayout, Settings};
use crate::models::{DisplayNames, Report};
use crate::pdf::{
    page_count, write_atomically, write_to_sink, FooterDecorator, Fragment, PageDecorator,
    PdfBuilder, PdfGenerator,
};
use crate::templates::sections;

/// A compiled report.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub pdf: Vec<u8>,
    pub page_count: usize,
}

/// Turns one report into one PDF: runs the section builders in page order,
/// installs the page footer and hands the markup to the compiler.
///
/// Holds no mutable state; a single instance can serve concurrent callers.
pub struct ReportAssembler {
    layout: ReportLayout,
    generator: PdfGenerator,
    decorator: Arc<dyn PageDecorator>,
}

impl ReportAssembler {
    /// Fails when the layout names a logo that cannot be found.
    pub fn new(layout: ReportLayout) -> DocumentResult<Self> {
        Ok(Self::from_resolved(layout.resolve_paths()?))
    }

    fn from_resolved(layout: ReportLayout) -> Self {
        let generator = PdfGenerator::new(layout.variant.pdf_config());
        let decorator = Arc::new(FooterDecorator::from(&layout.footer));
        ReportAssembler {
            layout,
            generator,
            decorator,
        }
    }

    pub fn from_settings(settings: &Settings) -> DocumentResult<Self> {
        let mut assembler = Self::new(settings.layout.clone())?;
        assembler.generator = assembler
            .generator
            .with_typst_binary(settings.typst_binary.clone())
            .with_temp_dir(settings.temp_dir.clone());
        Ok(assembler)
    }

    pub fn with_generator(mut self, generator: PdfGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn decorator(&self) -> &dyn PageDecorator {
        self.decorator.as_ref()
    }

    pub fn generator(&self) -> &PdfGenerator {
        &self.generator
    }

    pub fn fragments(&self, report: &Report, names: &DisplayNames) -> Vec<Fragment> {
        sections::build_all(report, names, &self.layout)
    }

    /// Complete Typst source for the report. Identical inputs give identical
    /// output.
    pub fn render_source(&self, report: &Report, names: &DisplayNames) -> String {
        let mut builder = PdfBuilder::new();
        for fragment in self.fragments(report, names) {
            builder.add_fragment(&fragment);
        }

        let metadata = DocumentMetadata {
            title: format!("Rapport d'intervention n°{}", report.id),
            author: names.creator.clone(),
        };

        self.generator
            .generate_typst_document(&metadata, self.decorator.as_ref(), &builder.build())
    }

    /// Render and compile without writing anywhere.
    pub fn generate(&self, report: &Report, names: &DisplayNames) -> DocumentResult<AssembledDocument> {
        let span = tracing::info_span!("assemble_report", report_id = report.id);
        let _guard = span.enter();

        if report.finishes_before_request() {
            tracing::warn!(
                request_date = %report.request_date,
                work_finish_date = %report.work_finish_date,
                "work finish date precedes request date"
            );
        }

        let source = self.render_source(report, names);
        let pdf = self.generator.compile(&source)?;
        let pages = page_count(&pdf)?;

        tracing::info!(bytes = pdf.len(), pages, "report assembled");
        Ok(AssembledDocument {
            pdf,
            page_count: pages,
        })
    }

    /// Generate the report and write it to `sink`. Nothing is written unless
    /// compilation succeeded.
    pub fn assemble<W: Write>(
        &self,
        report: &Report,
        names: &DisplayNames,
        sink: &mut W,
    ) -> DocumentResult<AssembledDocument> {
        let document = self.generate(report, names)?;
        write_to_sink(&document.pdf, sink)?;
        Ok(document)
    }

    /// Generate the report and atomically replace the file at `path`.
    pub fn assemble_to_path(
        &self,
        report: &Report,
        names: &DisplayNames,
        path: &Path,
    ) -> DocumentResult<AssembledDocument> {
        let document = self.generate(report, names)?;
        write_atomically(&document.pdf, path)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(document)
    }

    /// Run [`ReportAssembler::generate`] on the blocking pool so async callers
    /// are not stalled by the compiler.
    pub async fn assemble_async(
        self: Arc<Self>,
        report: Report,
        names: DisplayNames,
    ) -> DocumentResult<AssembledDocument> {
        tokio::task::spawn_blocking(move || self.generate(&report, &names))
            .await
            .map_err(|e| DocumentError::Task(e.to_string()))?
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        // The default layout has no logo to resolve.
        Self::from_resolved(ReportLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LayoutVariant;
    use crate::models::report::fixtures::{assembly_report, disassembly_report, names};

    #[test]
    fn source_is_deterministic() {
        let assembler = ReportAssembler::default();
        let first = assembler.render_source(&assembly_report(), &names());
        let second = assembler.render_source(&assembly_report(), &names());
        assert_eq!(first, second);
    }

    #[test]
    fn footer_is_registered_before_any_section() {
        let assembler = ReportAssembler::default();
        let source = assembler.render_source(&assembly_report(), &names());

        let footer = source.find("footer: context").unwrap();
        let first_section = source.find("// header").unwrap();
        assert!(footer < first_section);
        assert!(source.contains(assembler.decorator().fixed_text()));
    }

    #[test]
    fn sections_appear_in_order() {
        let source = ReportAssembler::default().render_source(&assembly_report(), &names());
        let positions: Vec<usize> = [
            "// header",
            "// general_info",
            "// financial_info",
            "// technical_info",
            "// notes",
        ]
        .iter()
        .map(|marker| source.find(marker).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn compact_variant_changes_margins_only() {
        let layout = ReportLayout {
            variant: LayoutVariant::Compact,
            ..ReportLayout::default()
        };
        let source = ReportAssembler::new(layout)
            .unwrap()
            .render_source(&disassembly_report(), &names());
        assert!(source.contains("margin: (top: 30pt"));
        assert!(source.contains("paper: \"a4\""));
    }

    #[test]
    fn relative_logo_is_emitted_as_absolute_path() {
        let logo = tempfile::Builder::new()
            .prefix("logo-")
            .suffix(".png")
            .tempfile_in(".")
            .unwrap();
        let file_name = logo.path().file_name().unwrap().to_string_lossy().into_owned();
        let layout = ReportLayout {
            logo_path: Some(file_name.clone().into()),
            ..ReportLayout::default()
        };

        let source = ReportAssembler::new(layout)
            .unwrap()
            .render_source(&assembly_report(), &names());

        let start = source.find("image(\"").unwrap() + "image(\"".len();
        let end = start + source[start..].find('"').unwrap();
        let emitted = std::path::Path::new(&source[start..end]);
        assert!(emitted.is_absolute());
        assert!(emitted.ends_with(&file_name));
    }

    #[test]
    fn unknown_logo_fails_construction() {
        let layout = ReportLayout {
            logo_path: Some("assets/absent-logo.png".into()),
            ..ReportLayout::default()
        };
        assert!(matches!(ReportAssembler::new(layout), Err(DocumentError::Io(_))));
    }

    #[test]
    fn missing_compiler_writes_nothing() {
        let generator = PdfGenerator::new(Default::default()).with_typst_binary("/nonexistent/typst");
        let assembler = ReportAssembler::default().with_generator(generator);

        let mut sink = Vec::new();
        let result = assembler.assemble(&assembly_report(), &names(), &mut sink);
        assert!(matches!(result, Err(DocumentError::CompilerLaunch { .. })));
        assert!(sink.is_empty());
    }
}
