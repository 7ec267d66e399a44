use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::{ExportDocument, ExportError};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 42;
const BODY_SIZE: i64 = 11;
const TITLE_SIZE: i64 = 14;
const LEADING: i64 = 16;
// Helvetica averages about half an em per glyph.
const WRAP_COLUMNS: usize = ((PAGE_WIDTH - 2 * MARGIN) / (BODY_SIZE / 2 + 1)) as usize;
const TITLE_COLUMNS: usize = WRAP_COLUMNS * BODY_SIZE as usize / TITLE_SIZE as usize;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

enum Line {
    Title(String),
    Body(String),
}

pub fn render_pdf(document: ExportDocument<'_>) -> Result<Vec<u8>, ExportError> {
    let mut lines = Vec::new();
    if let Some(title) = document.title {
        for part in wrap(title.trim(), TITLE_COLUMNS) {
            lines.push(Line::Title(part));
        }
        lines.push(Line::Body(String::new()));
    }
    for source in document.body.lines() {
        for part in wrap(source.trim_end(), WRAP_COLUMNS) {
            lines.push(Line::Body(part));
        }
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(font("Helvetica"));
    let bold = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids: Vec<Object> = Vec::new();
    let chunks: Vec<&[Line]> = if lines.is_empty() {
        vec![lines.as_slice()]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };
    for chunk in chunks {
        let page_id = add_page(&mut doc, pages_id, chunk)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(doc: &mut Document, pages_id: ObjectId, lines: &[Line]) -> Result<ObjectId, ExportError> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];
    for line in lines {
        let (font, size, text) = match line {
            Line::Title(text) => ("F2", TITLE_SIZE, text),
            Line::Body(text) => ("F1", BODY_SIZE, text),
        };
        operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(text))],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations }
        .encode()
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Greedy word wrap by character count; words longer than a line are split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > columns {
            if width > 0 {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            let rest = word.split_off(columns);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if width == 0 { word.len() } else { width + 1 + word.len() };
        if needed > columns {
            lines.push(std::mem::take(&mut current));
            width = 0;
        }
        if width > 0 {
            current.push(' ');
            width += 1;
        }
        width += word.len();
        current.extend(word);
    }

    if width > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encodes text for the standard Type1 fonts, which only cover WinAnsi.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap("contratação de serviços de limpeza", 16),
            vec!["contratação de", "serviços de", "limpeza"]
        );
        assert_eq!(wrap("", 10), vec![String::new()]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn encodes_portuguese_text_as_win_ansi() {
        assert_eq!(win_ansi("ção"), vec![0xe7, 0xe3, b'o']);
        assert_eq!(win_ansi("“art. 74”"), b"\x93art. 74\x94".to_vec());
        assert_eq!(win_ansi("→"), b"?".to_vec());
    }

    #[test]
    fn paginates_long_documents() {
        let body = (0..LINES_PER_PAGE * 2 + 3)
            .map(|index| format!("Cláusula {index}"))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = render_pdf(ExportDocument::new(&body)).expect("pdf renders");
        assert!(bytes.starts_with(b"%PDF"));

        let parsed = Document::load_mem(&bytes).expect("output parses");
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn empty_document_has_one_page() {
        let bytes = render_pdf(ExportDocument::new("")).expect("pdf renders");
        let parsed = Document::load_mem(&bytes).expect("output parses");
        assert_eq!(parsed.get_pages().len(), 1);
    }
}
