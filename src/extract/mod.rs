//! Document text extraction
//!
//! Turns uploaded file bytes plus a declared MIME type into plain text:
//!
//! - `application/pdf`: embedded text layer, OCR when the layer is empty
//! - DOCX: body paragraphs joined with newlines
//! - `text/*`: strict UTF-8
//!
//! Legacy binary `.doc` (`application/msword`) is rejected as unsupported.

mod docx;
mod pdf;
mod registry;
mod text;
mod types;

pub use docx::{read_paragraphs, DocxExtractor};
pub use pdf::{extract_text_layer, render_pages, PdfExtractor};
pub use registry::{ExtractorRegistry, FormatExtractor};
pub use text::PlainTextExtractor;
pub use types::{mime, normalize_mime, ExtractError};
