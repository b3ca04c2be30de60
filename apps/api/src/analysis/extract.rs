//! Resume file → something the analyzer can read.
//!
//! PDF, DOCX and text files are reduced to plain text. Images have no text layer and are
//! handed to the model as inline file data.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::analysis::ResumeDocument;
use crate::errors::AppError;

/// Below this many characters there is nothing worth sending to the model.
pub const MIN_RESUME_CHARS: usize = 20;

/// Gemini rejects inline payloads above 20 MB.
pub const MAX_INLINE_BYTES: usize = 20 * 1024 * 1024;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
    Docx,
    Image { mime_type: &'static str },
}

impl ResumeFormat {
    /// Guesses the format from the file extension. Unknown extensions are read as PDF,
    /// which is what the upload form produces.
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.trim().to_lowercase();
        let ext = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
        match ext {
            "txt" | "md" | "text" => ResumeFormat::PlainText,
            "docx" => ResumeFormat::Docx,
            "png" => ResumeFormat::Image {
                mime_type: "image/png",
            },
            "jpg" | "jpeg" => ResumeFormat::Image {
                mime_type: "image/jpeg",
            },
            "webp" => ResumeFormat::Image {
                mime_type: "image/webp",
            },
            _ => ResumeFormat::Pdf,
        }
    }
}

/// Turns downloaded bytes into an analyzer input. CPU-bound for PDF and DOCX;
/// call from a blocking task.
pub fn prepare_document(format: ResumeFormat, data: Bytes) -> Result<ResumeDocument, AppError> {
    let text = match format {
        ResumeFormat::Image { mime_type } => {
            if data.is_empty() {
                return Err(AppError::UnprocessableEntity(
                    "Resume image is empty".to_string(),
                ));
            }
            if data.len() > MAX_INLINE_BYTES {
                return Err(AppError::UnprocessableEntity(format!(
                    "Resume image is larger than {} MB",
                    MAX_INLINE_BYTES / (1024 * 1024)
                )));
            }
            return Ok(ResumeDocument::Inline { mime_type, data });
        }
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(&data).map_err(|e| {
            AppError::UnprocessableEntity(format!("Failed to read PDF resume: {e}"))
        })?,
        ResumeFormat::PlainText => String::from_utf8_lossy(&data).into_owned(),
        ResumeFormat::Docx => docx_text(&data)?,
    };

    if text.trim().chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::UnprocessableEntity(
            "Resume does not contain enough readable text".to_string(),
        ));
    }
    Ok(ResumeDocument::Text(text))
}

/// Raw text of a DOCX body: one line per paragraph, tabs and breaks kept.
fn docx_text(data: &[u8]) -> Result<String, AppError> {
    let unreadable =
        |e: String| AppError::UnprocessableEntity(format!("Failed to read DOCX resume: {e}"));

    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| unreadable(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| unreadable(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| unreadable(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let run = t.unescape().map_err(|e| unreadable(e.to_string()))?;
                text.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(unreadable(e.to_string())),
        }
    }

    Ok(text)
}
