use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run};

use super::{ExportDocument, ExportError};

// Sizes are in half-points.
const TITLE_SIZE: usize = 28;
const BODY_SIZE: usize = 24;

pub fn render_docx(document: ExportDocument<'_>) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new();

    if let Some(title) = document.title {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(title.trim()).bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
        );
    }

    for line in document.body.lines() {
        docx = docx.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(line.trim_end()).size(BODY_SIZE)),
        );
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|err| ExportError::Docx(err.to_string()))?;
    Ok(buffer.into_inner())
}
