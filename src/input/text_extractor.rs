//! Text extraction from resume and job description documents

use crate::error::{Result, SkillMatchError};
use pulldown_cmark::{html, Parser};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

/// Turns a document into plain text.
///
/// An empty document yields `Ok("")`; a document that cannot be parsed
/// yields an error, so callers can tell the two apart.
pub trait TextExtractor: Sync {
    /// Extract from raw document bytes. `source` names the document in errors.
    fn extract_bytes(&self, bytes: &[u8], source: &str) -> Result<String>;

    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send {
        async move {
            let bytes = fs::read(path).await?;
            self.extract_bytes(&bytes, &path.display().to_string())
        }
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_bytes(&self, bytes: &[u8], source: &str) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            SkillMatchError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                source, e
            ))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_bytes(&self, bytes: &[u8], _source: &str) -> Result<String> {
        // Resumes exported from word processors are not always valid UTF-8
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract_bytes(&self, bytes: &[u8], source: &str) -> Result<String> {
        let markdown_content = std::str::from_utf8(bytes).map_err(|e| {
            SkillMatchError::TextProcessing(format!("'{}' is not valid UTF-8: {}", source, e))
        })?;
        Ok(self.markdown_to_text(markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> String {
        static TAG: OnceLock<Regex> = OnceLock::new();
        let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let clean_text = tag.replace_all(&text, "").replace("&amp;", "&");

        clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Word documents: the body paragraphs of `word/document.xml`.
pub struct DocxExtractor;

const DOCX_BODY: &str = "word/document.xml";

impl TextExtractor for DocxExtractor {
    fn extract_bytes(&self, bytes: &[u8], source: &str) -> Result<String> {
        let docx_error =
            |e: &dyn std::fmt::Display| SkillMatchError::DocxExtraction(format!("'{}': {}", source, e));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_error(&e))?;
        let mut body = archive.by_name(DOCX_BODY).map_err(|e| docx_error(&e))?;

        let mut xml = String::new();
        body.read_to_string(&mut xml)?;

        document_xml_to_text(&xml).map_err(|e| docx_error(&e))
    }
}

/// Paragraph text of a WordprocessingML body, one non-empty paragraph per line.
pub fn document_xml_to_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs.join("\n"))
}
