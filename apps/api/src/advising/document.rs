//! Document ingestion: turns an uploaded report or certificate into plain text.
//!
//! PDF and DOCX extraction are CPU-bound and run inside
//! `tokio::task::spawn_blocking`. A DOCX is read as a zip archive; only the
//! `<w:t>` runs of `word/document.xml` are kept, one line per paragraph.
//! Every failure here is recoverable: callers log it and continue the
//! analysis without the attachment.

use std::io::{Cursor, Read};

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported document format: {0} (upload PDF, DOCX or TXT)")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("text file is not valid UTF-8")]
    Encoding,

    #[error("document contains no readable text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Docx,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::Text),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// Metadata kept on the session once the text has been indexed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub processed_at: DateTime<Utc>,
    pub char_count: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl UploadedDocument {
    fn new(source: &str, text: String) -> Result<Self, DocumentError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(DocumentError::Empty);
        }
        let metadata = DocumentMetadata {
            source: source.to_string(),
            processed_at: Utc::now(),
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
        };
        Ok(Self { text, metadata })
    }
}

/// Extracts text from an uploaded file, choosing the extractor by extension.
pub async fn extract_text(file_name: &str, data: bytes::Bytes) -> Result<UploadedDocument, DocumentError> {
    let kind = DocumentKind::from_file_name(file_name)
        .ok_or_else(|| DocumentError::UnsupportedFormat(file_name.to_string()))?;

    let text = match kind {
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| DocumentError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| DocumentError::Pdf(format!("extraction task failed: {e}")))??,
        DocumentKind::Text => String::from_utf8(data.to_vec()).map_err(|_| DocumentError::Encoding)?,
        DocumentKind::Docx => tokio::task::spawn_blocking(move || extract_docx_text(&data))
            .await
            .map_err(|e| DocumentError::Docx(format!("extraction task failed: {e}")))??,
    };

    UploadedDocument::new(file_name, text)
}

const DOCX_BODY: &str = "word/document.xml";

fn extract_docx_text(data: &[u8]) -> Result<String, DocumentError> {
    let docx_err = |e: &dyn std::fmt::Display| DocumentError::Docx(e.to_string());

    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| docx_err(&e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| docx_err(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(&e))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(|e| docx_err(&e))? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().map_err(|e| docx_err(&e))?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("rapor.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("catatan.txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_file_name("sertifikat.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("foto.png"), None);
        assert_eq!(DocumentKind::from_file_name("noext"), None);
    }

    #[tokio::test]
    async fn test_text_upload_extracts_and_counts() {
        let doc = extract_text("rapor.txt", Bytes::from_static("  Juara 1 olimpiade biologi \n".as_bytes()))
            .await
            .unwrap();
        assert_eq!(doc.text, "Juara 1 olimpiade biologi");
        assert_eq!(doc.metadata.source, "rapor.txt");
        assert_eq!(doc.metadata.char_count, 25);
        assert_eq!(doc.metadata.word_count, 4);
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_error() {
        let err = extract_text("kosong.txt", Bytes::from_static(b" \n\t")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Empty));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_encoding_error() {
        let err = extract_text("rusak.txt", Bytes::from_static(&[0xff, 0xfe, 0x00])).await.unwrap_err();
        assert!(matches!(err, DocumentError::Encoding));
    }

    fn docx(body: &str) -> Bytes {
        use std::io::Write;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY, zip::write::FileOptions::default())
            .unwrap();
        write!(
            writer,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
        .unwrap();
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[tokio::test]
    async fn test_docx_paragraphs_become_lines() {
        let data = docx(
            r#"<w:p><w:r><w:t>Juara 2 </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>Olimpiade Fisika</w:t></w:r></w:p><w:p><w:r><w:t xml:space="preserve">Ketua OSIS &amp; MPK</w:t></w:r></w:p><w:sectPr><w:pgSz w:w="11906"/></w:sectPr>"#,
        );
        let doc = extract_text("sertifikat.docx", data).await.unwrap();
        assert_eq!(doc.text, "Juara 2 Olimpiade Fisika\nKetua OSIS & MPK");
        assert_eq!(doc.metadata.source, "sertifikat.docx");
        assert_eq!(doc.metadata.word_count, 8);
    }

    #[tokio::test]
    async fn test_docx_without_text_is_empty_error() {
        let err = extract_text("kosong.docx", docx("<w:p/>")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Empty));
    }

    #[tokio::test]
    async fn test_garbage_docx_is_docx_error() {
        let err = extract_text("cv.docx", Bytes::from_static(b"PK")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Docx(_)));
    }

    #[tokio::test]
    async fn test_unknown_extension_is_unsupported() {
        let err = extract_text("foto.jpg", Bytes::from_static(b"x")).await.unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_pdf_error() {
        let err = extract_text("rapor.pdf", Bytes::from_static(b"not a pdf")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }
}
