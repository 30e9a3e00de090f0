//! Raw text extraction for the two supported document types.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;

/// Upload ceiling; larger documents are rejected before any parsing.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Accepts an extension (`pdf`, `.docx`), a file name (`cv.PDF`) or a MIME type.
    pub fn from_label(label: &str) -> Result<Self, AppError> {
        let lowered = label.trim().to_ascii_lowercase();
        let candidate = if lowered.contains('/') {
            lowered.as_str()
        } else {
            lowered.rsplit('.').next().unwrap_or(lowered.as_str())
        };

        match candidate {
            "pdf" | "application/pdf" => Ok(DocumentFormat::Pdf),
            "docx" | DOCX_MIME => Ok(DocumentFormat::Docx),
            _ => Err(AppError::UnsupportedFormat(format!(
                "'{label}' is not supported; upload a PDF or DOCX file"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Extracts text with line breaks preserved. Fails with `ExtractionFailure`
/// when nothing readable comes out (scanned, image-only documents).
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, AppError> {
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
    };

    let text = normalize_text(&raw);
    if text.trim().is_empty() {
        return Err(AppError::ExtractionFailure(format!(
            "No readable text found in the {} document",
            format.as_str()
        )));
    }

    debug!(
        "Extracted {} chars from {} document",
        text.len(),
        format.as_str()
    );
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AppError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AppError::ExtractionFailure(format!(
            "PDF parsing failed: {e}"
        ))),
        Err(_) => Err(AppError::ExtractionFailure(
            "PDF parsing failed: unreadable document structure".to_string(),
        )),
    }
}

/// Paragraph boundaries, text runs, tabs and breaks, in document order.
static DOCX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>|</w:p>|<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab(?:\s[^>]*)?/>|<w:(?:br|cr)(?:\s[^>]*)?/>",
    )
    .unwrap()
});

/// Legacy VML copy of a drawing; Word writes text boxes twice, once per rendering.
static MC_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<mc:Fallback\b.*?</mc:Fallback>").unwrap());

static XML_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9A-Fa-f]+)|(lt|gt|quot|apos|amp));").unwrap()
});

fn extract_docx(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::ExtractionFailure(format!("DOCX container unreadable: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| AppError::ExtractionFailure(format!("DOCX body missing: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::ExtractionFailure(format!("DOCX body unreadable: {e}")))?;

    Ok(docx_paragraphs(&xml).join("\n"))
}

/// One string per `<w:p>`; empty paragraphs (`<w:p/>`, `<w:p w:rsidR=".."/>`,
/// `<w:p></w:p>`) become blank lines.
///
/// Paragraphs nest inside text boxes. A nested paragraph flushes the text its
/// parent has collected so far and becomes a line of its own; the parent's
/// remaining runs continue on the following line.
fn docx_paragraphs(xml: &str) -> Vec<String> {
    let xml = MC_FALLBACK.replace_all(xml, "");

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    // one flag per open paragraph: whether it already emitted a line
    let mut open: Vec<bool> = Vec::new();

    for token in DOCX_TOKEN.captures_iter(&xml) {
        let tag = &token[0];
        if let Some(text) = token.get(1) {
            if !open.is_empty() {
                current.push_str(&decode_entities(text.as_str()));
            }
        } else if tag == "</w:p>" {
            let Some(emitted) = open.pop() else {
                continue;
            };
            if !current.is_empty() || !emitted {
                lines.push(std::mem::take(&mut current));
            }
        } else if tag.starts_with("<w:p") {
            if tag.ends_with("/>") {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if let Some(parent) = open.last_mut() {
                    *parent = true;
                }
                lines.push(String::new());
                continue;
            }
            if let Some(parent) = open.last_mut() {
                *parent = true;
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            open.push(false);
        } else if open.is_empty() {
            continue;
        } else if tag.starts_with("<w:tab") {
            current.push('\t');
        } else {
            current.push('\n');
        }
    }

    // unterminated body: keep whatever was collected
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Named and numeric character references, decoded in one pass.
fn decode_entities(text: &str) -> String {
    XML_ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                match &caps[3] {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => Some('&'),
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Unifies line endings and page breaks, strips trailing spaces.
fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace(['\r', '\u{c}'], "\n")
        .replace('\u{a0}', " ")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Builds a minimal DOCX container with one paragraph per line.
    pub(crate) fn docx_fixture(lines: &[&str]) -> Vec<u8> {
        let body: String = lines
            .iter()
            .map(|line| {
                if line.is_empty() {
                    "<w:p/>".to_string()
                } else {
                    format!(
                        "<w:p><w:pPr><w:pStyle w:val=\"Normal\"/></w:pPr><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                        line.replace('&', "&amp;").replace('<', "&lt;")
                    )
                }
            })
            .collect();
        docx_from_body(&body)
    }

    /// Wraps raw `<w:body>` markup in a DOCX container.
    pub(crate) fn docx_from_body(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\"><w:body>{body}</w:body></w:document>"
        );

        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file(DOCX_BODY, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(DocumentFormat::from_label("pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_label(".DOCX").unwrap(), DocumentFormat::Docx);
        assert_eq!(
            DocumentFormat::from_label("My Resume.final.pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_label("application/pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(DocumentFormat::from_label(DOCX_MIME).unwrap(), DocumentFormat::Docx);
    }

    #[test]
    fn test_unsupported_labels() {
        for label in ["doc", "resume.txt", "image/png", "rtf", ""] {
            assert!(
                matches!(
                    DocumentFormat::from_label(label),
                    Err(AppError::UnsupportedFormat(_))
                ),
                "{label} should be unsupported"
            );
        }
    }

    #[test]
    fn test_docx_text_keeps_paragraph_breaks() {
        let bytes = docx_fixture(&["Jane Doe", "", "Skills", "Go, Rust & SQL"]);
        let text = extract_text(&bytes, DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Jane Doe\n\nSkills\nGo, Rust & SQL");
    }

    #[test]
    fn test_docx_without_text_is_extraction_failure() {
        let bytes = docx_fixture(&["", ""]);
        assert!(matches!(
            extract_text(&bytes, DocumentFormat::Docx),
            Err(AppError::ExtractionFailure(_))
        ));
    }

    #[test]
    fn test_garbage_docx_is_extraction_failure() {
        assert!(matches!(
            extract_text(b"definitely not a zip", DocumentFormat::Docx),
            Err(AppError::ExtractionFailure(_))
        ));
    }

    #[test]
    fn test_garbage_pdf_is_extraction_failure() {
        assert!(matches!(
            extract_text(b"%PDF-1.4 truncated", DocumentFormat::Pdf),
            Err(AppError::ExtractionFailure(_))
        ));
    }

    /// A run as Word writes it, with run properties and a revision id.
    fn run(text: &str) -> String {
        format!("<w:r w:rsidRPr=\"00C3\"><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">{text}</w:t></w:r>")
    }

    #[test]
    fn test_attributed_empty_paragraph_is_a_blank_line() {
        let xml = format!(
            "<w:p w:rsidR=\"00A1\">{}</w:p><w:p w:rsidR=\"00A1\" w:rsidRDefault=\"00B2\"/><w:p>{}</w:p><w:p w:rsidR=\"00A1\"><w:pPr><w:spacing w:after=\"0\"/></w:pPr></w:p><w:p>{}</w:p>",
            run("Engineer, Globex"),
            run("Intern, Hooli"),
            run("Acme")
        );
        assert_eq!(
            docx_paragraphs(&xml),
            vec!["Engineer, Globex", "", "Intern, Hooli", "", "Acme"]
        );
    }

    #[test]
    fn test_text_box_inside_paragraph_keeps_every_run() {
        let xml = format!(
            "<w:p>{}<w:r><mc:AlternateContent><mc:Choice Requires=\"wps\"><w:drawing><wps:txbx><w:txbxContent><w:p>{}</w:p><w:p>{}</w:p></w:txbxContent></wps:txbx></w:drawing></mc:Choice><mc:Fallback><w:pict><v:textbox><w:txbxContent><w:p>{}</w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback></mc:AlternateContent></w:r>{}</w:p>",
            run("Alpha"),
            run("Beta"),
            run("Delta"),
            run("Beta"),
            run("Gamma")
        );
        assert_eq!(docx_paragraphs(&xml), vec!["Alpha", "Beta", "Delta", "Gamma"]);
    }

    #[test]
    fn test_text_box_at_paragraph_end_adds_no_blank_line() {
        let xml = format!(
            "<w:p>{}<w:r><w:txbxContent><w:p>{}</w:p></w:txbxContent></w:r></w:p><w:p>{}</w:p>",
            run("Jane Doe"),
            run("jane@example.com"),
            run("Experience")
        );
        assert_eq!(
            docx_paragraphs(&xml),
            vec!["Jane Doe", "jane@example.com", "Experience"]
        );
    }

    #[test]
    fn test_runs_tabs_and_breaks_join_within_a_paragraph() {
        let xml = format!(
            "<w:p>{}<w:r><w:tab/></w:r>{}<w:r><w:br w:type=\"textWrapping\"/></w:r>{}</w:p>",
            run("Go"),
            run("Rust"),
            run("SQL")
        );
        assert_eq!(docx_paragraphs(&xml), vec!["Go\tRust\nSQL"]);
    }

    #[test]
    fn test_entities_are_decoded_once() {
        let xml = format!(
            "<w:p>{}</w:p>",
            run("O&#8217;Reilly &#x2013; R&amp;D &amp;lt;tag&gt; &#99999999;")
        );
        assert_eq!(
            docx_paragraphs(&xml),
            vec!["O\u{2019}Reilly \u{2013} R&D &lt;tag> &#99999999;"]
        );
    }

    #[test]
    fn test_word_shaped_docx_extracts_every_line() {
        let body = format!(
            "<w:p w:rsidR=\"1\">{}</w:p><w:p w:rsidR=\"2\"/><w:p>{}{}</w:p>",
            run("Skills"),
            run("Go, "),
            run("Rust")
        );
        let text = extract_text(&docx_from_body(&body), DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Skills\n\nGo, Rust");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a \r\nb\u{c}c\u{a0}d  "), "a\nb\nc d");
    }
}
