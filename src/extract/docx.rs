//! DOCX extractor
//!
//! Reads `word/document.xml` from the OOXML container and returns the text of
//! each body paragraph in document order. Paragraphs nested in tables, text
//! boxes or block-level content controls (`w:sdt`) are not part of the body
//! and are skipped. Elements are matched by namespace, not by prefix.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use zip::ZipArchive;

use super::registry::FormatExtractor;
use super::types::{mime, ExtractError};

const DOCUMENT_PART: &str = "word/document.xml";
const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Paragraph text extraction for `.docx` uploads
pub struct DocxExtractor;

#[async_trait]
impl FormatExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn accepts(&self, mime_type: &str) -> bool {
        mime_type == mime::DOCX
    }

    async fn extract(&self, data: Vec<u8>) -> Result<String, ExtractError> {
        let paragraphs = read_paragraphs(&data)?;
        tracing::debug!("DOCX contains {} body paragraphs", paragraphs.len());
        Ok(paragraphs.join("\n"))
    }
}

/// Read body paragraphs from DOCX bytes
pub fn read_paragraphs(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("Missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("Failed to read {}: {}", DOCUMENT_PART, e)))?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = NsReader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    // Depth inside tables, text boxes and block-level content controls
    let mut nested = 0usize;
    let mut in_text = false;
    let mut in_props = false;

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(|e| {
            ExtractError::Docx(format!("Malformed {}: {}", DOCUMENT_PART, e))
        })?;

        match event {
            Event::Start(e) if is_wordml(&ns) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested += 1,
                // An sdt opened outside any paragraph is block-level
                b"sdt" if current.is_none() => nested += 1,
                b"p" if nested == 0 => current = Some(String::new()),
                b"pPr" => in_props = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if is_wordml(&ns) => {
                if nested > 0 || in_props {
                    continue;
                }
                match e.local_name().as_ref() {
                    b"p" => paragraphs.push(String::new()),
                    b"tab" => push_to(&mut current, "\t"),
                    b"br" | b"cr" => push_to(&mut current, "\n"),
                    _ => {}
                }
            }
            Event::Text(t) => {
                if in_text && nested == 0 {
                    let text = t.unescape().map_err(|e| {
                        ExtractError::Docx(format!("Invalid text in {}: {}", DOCUMENT_PART, e))
                    })?;
                    push_to(&mut current, &text);
                }
            }
            Event::End(e) if is_wordml(&ns) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested = nested.saturating_sub(1),
                b"sdt" if current.is_none() => nested = nested.saturating_sub(1),
                b"p" if nested == 0 => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"pPr" => in_props = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Element belongs to WordprocessingML, whatever prefix the document binds it to
fn is_wordml(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WORDML_NS)
}

fn push_to(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Build an in-memory DOCX whose body is `body_xml`
    pub(crate) fn docx_with_body(body_xml: &str) -> Vec<u8> {
        docx_with_document(&format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body_xml
        ))
    }

    /// Build an in-memory DOCX with `document_xml` as its main part
    fn docx_with_document(document_xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .unwrap();
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    pub(crate) fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, p))
            .collect();
        docx_with_body(&body)
    }

    #[tokio::test]
    async fn test_paragraphs_joined_with_newline() {
        let data = docx_with_paragraphs(&["Line 1", "Line 2"]);
        let text = DocxExtractor.extract(data).await.unwrap();

        assert_eq!(text, "Line 1\nLine 2");
    }

    #[test]
    fn test_runs_are_concatenated() {
        let data = docx_with_body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Skills:</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Rust, </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>SQL</w:t></w:r></w:p>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Skills:\tRust, SQL"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let data = docx_with_body(
            r#"<w:p><w:r><w:t>Top</w:t></w:r></w:p><w:p/><w:p><w:pPr><w:jc w:val="center"/></w:pPr></w:p><w:p><w:r><w:t>Bottom</w:t></w:r></w:p>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Top", "", "", "Bottom"]);
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let data = docx_with_body(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Before", "After"]);
    }

    #[test]
    fn test_entities_and_breaks() {
        let data = docx_with_body(
            r#"<w:p><w:r><w:t>R&amp;D</w:t><w:br/><w:t>Team &lt;Lead&gt;</w:t></w:r></w:p>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["R&D\nTeam <Lead>"]);
    }

    #[test]
    fn test_not_a_zip() {
        let result = read_paragraphs(b"%PDF-1.4 definitely not a docx");
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let result = read_paragraphs(&data);
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let data = docx_with_paragraphs(&["Same", "Output"]);
        assert_eq!(read_paragraphs(&data).unwrap(), read_paragraphs(&data).unwrap());
    }

    #[test]
    fn test_default_namespace_document() {
        let data = docx_with_document(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<document xmlns="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><body><p><r><t>Line 1</t></r></p><p><r><t>Line 2</t></r></p></body></document>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Line 1", "Line 2"]);
    }

    #[test]
    fn test_custom_prefix_document() {
        let data = docx_with_document(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<x:document xmlns:x="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><x:body><x:p><x:r><x:t>Line 1</x:t><x:tab/><x:t>A</x:t></x:r></x:p><x:tbl><x:tr><x:tc><x:p><x:r><x:t>Cell</x:t></x:r></x:p></x:tc></x:tr></x:tbl><x:p><x:r><x:t>Line 2</x:t></x:r></x:p></x:body></x:document>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Line 1\tA", "Line 2"]);
    }

    #[test]
    fn test_foreign_namespace_is_ignored() {
        let data = docx_with_body(
            r#"<w:p><w:r><w:t>Kept</w:t></w:r></w:p><o:p xmlns:o="urn:example:other"><o:t>Dropped</o:t></o:p>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Kept"]);
    }

    #[test]
    fn test_block_content_control_is_skipped() {
        let data = docx_with_body(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:sdt><w:sdtPr/><w:sdtContent><w:p><w:r><w:t>Cover page</w:t></w:r></w:p></w:sdtContent></w:sdt><w:p><w:sdt><w:sdtContent><w:r><w:t>Inline</w:t></w:r></w:sdtContent></w:sdt></w:p><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );

        let paragraphs = read_paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["Before", "Inline", "After"]);
    }
}
