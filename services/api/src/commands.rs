use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use licicontrol::error::AppError;
use licicontrol::export::{render, ExportDocument, ExportError, ExportFormat};
use licicontrol::workflows::auditor::{audit_text, AuditReport, SUBMISSION_THRESHOLD};

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct AuditArgs {
    /// Read the opinion from a UTF-8 text file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Score the given text directly
    #[arg(long)]
    pub(crate) text: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Plain-text document to convert
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination file
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// pdf or docx. Inferred from the output extension when omitted.
    #[arg(long)]
    pub(crate) format: Option<String>,
    /// Heading printed above the body
    #[arg(long)]
    pub(crate) title: Option<String>,
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => String::new(),
    };
    print!("{}", render_audit(&audit_text(&text)));
    Ok(())
}

fn render_audit(report: &AuditReport) -> String {
    let mut out = format!("Compliance score: {}/100\n", report.score);
    let gate = if report.submission_allowed() {
        "allowed"
    } else {
        "blocked"
    };
    out.push_str(&format!(
        "Submission: {gate} (requires {SUBMISSION_THRESHOLD})\n"
    ));

    for (heading, entries) in [
        ("Critical alerts", &report.critical_alerts),
        ("Risks", &report.risks),
        ("Suggestions", &report.suggestions),
    ] {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{heading}\n"));
        for entry in entries {
            out.push_str(&format!("  - {entry}\n"));
        }
    }
    out
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let format = resolve_format(args.format.as_deref(), &args.output)?;
    let body = fs::read_to_string(&args.input)?;
    let document = match args.title.as_deref() {
        Some(title) => ExportDocument::titled(title, &body),
        None => ExportDocument::new(&body),
    };
    let bytes = render(format, document)?;
    fs::write(&args.output, &bytes)?;
    println!(
        "Wrote {} ({} bytes, {})",
        args.output.display(),
        bytes.len(),
        format.mime()
    );
    Ok(())
}

fn resolve_format(explicit: Option<&str>, output: &Path) -> Result<ExportFormat, ExportError> {
    if let Some(raw) = explicit {
        return raw.parse();
    }
    mime_guess::from_path(output)
        .iter()
        .find_map(|mime| ExportFormat::from_mime(&mime))
        .ok_or_else(|| ExportError::UnsupportedFormat(output.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_comes_from_flag_or_extension() {
        assert_eq!(
            resolve_format(Some("DOCX"), Path::new("out.pdf")).expect("explicit format"),
            ExportFormat::Docx
        );
        assert_eq!(
            resolve_format(None, Path::new("parecer.pdf")).expect("guessed format"),
            ExportFormat::Pdf
        );
        assert_eq!(
            resolve_format(None, Path::new("minuta.docx")).expect("guessed format"),
            ExportFormat::Docx
        );
        assert!(resolve_format(None, Path::new("notes.txt")).is_err());
    }

    #[test]
    fn audit_rendering_lists_findings() {
        let rendered = render_audit(&audit_text(
            "Parecer sobre contratação por inexigibilidade com valor estimado.",
        ));
        assert!(rendered.starts_with("Compliance score: 0/100"));
        assert!(rendered.contains("Submission: blocked (requires 75)"));
        assert!(rendered.contains("\nCritical alerts\n"));
        assert!(rendered.contains("\nRisks\n"));
    }
}
