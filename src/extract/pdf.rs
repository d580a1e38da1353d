//! PDF extractor
//!
//! Reads the embedded text layer with MuPDF. When that yields nothing (no
//! text layer, or the document could not be parsed for text) every page is
//! rendered and passed through OCR instead.
//!
//! MuPDF documents are not `Send`, so each step opens its own document
//! inside `spawn_blocking`.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix, TextPageOptions};

use super::registry::FormatExtractor;
use super::types::{mime, ExtractError};
use crate::ocr::OcrService;

/// PDF text extraction with OCR fallback
pub struct PdfExtractor {
    ocr: Arc<OcrService>,
}

impl PdfExtractor {
    pub fn new(ocr: Arc<OcrService>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl FormatExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn accepts(&self, mime_type: &str) -> bool {
        mime_type == mime::PDF
    }

    async fn extract(&self, data: Vec<u8>) -> Result<String, ExtractError> {
        let data = Arc::new(data);

        let text_layer = {
            let data = data.clone();
            run_blocking(move || extract_text_layer(&data)).await?
        };

        if let Some(text) = text_layer {
            tracing::debug!("PDF text layer yielded {} characters", text.len());
            return Ok(text);
        }

        tracing::info!("PDF has no extractable text layer, falling back to OCR");

        let scale = self.ocr.config().render_scale;
        let pages = run_blocking(move || render_pages(&data, scale)).await??;
        tracing::debug!("Rendered {} pages for OCR", pages.len());

        let text = self.ocr.recognize_pages(&pages).await?;
        if text.trim().is_empty() {
            tracing::warn!("OCR produced no text for {} pages", pages.len());
        }

        Ok(text)
    }
}

/// Text of every page joined with newlines, or `None` when there is nothing
/// to read.
///
/// Parse failures also yield `None`, which sends the document to OCR.
pub fn extract_text_layer(data: &[u8]) -> Option<String> {
    match read_text_layer(data) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            tracing::debug!("PDF text layer is empty");
            None
        }
        Err(e) => {
            tracing::debug!("PDF text layer unreadable: {}", e);
            None
        }
    }
}

fn read_text_layer(data: &[u8]) -> Result<String, mupdf::Error> {
    let doc = Document::from_bytes(data, mime::PDF)?;
    let page_count = doc.page_count()?;

    let mut pages = Vec::with_capacity(page_count.max(0) as usize);
    for index in 0..page_count {
        let page = doc.load_page(index)?;
        let text_page = page.to_text_page(TextPageOptions::empty())?;
        pages.push(text_page.to_text()?);
    }

    Ok(pages.join("\n"))
}

/// Render every page, in order, to PNG bytes
pub fn render_pages(data: &[u8], scale: f32) -> Result<Vec<Vec<u8>>, ExtractError> {
    let doc = Document::from_bytes(data, mime::PDF)?;
    let page_count = doc.page_count()?;

    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut images = Vec::with_capacity(page_count.max(0) as usize);
    for index in 0..page_count {
        let page = doc.load_page(index)?;
        let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;
        images.push(encode_png(&pixmap)?);
    }

    Ok(images)
}

fn encode_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, ExtractError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for pixel in 0..(width as usize * height as usize) {
        let offset = pixel * n;
        let r = samples.get(offset).copied().unwrap_or(255);
        let g = samples.get(offset + 1).copied().unwrap_or(r);
        let b = samples.get(offset + 2).copied().unwrap_or(r);
        rgb_buffer.extend_from_slice(&[r, g, b]);
    }

    let img = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| ExtractError::Pdf("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| ExtractError::Pdf(format!("Failed to encode page image: {}", e)))?;

    Ok(output)
}

async fn run_blocking<F, R>(f: F) -> Result<R, ExtractError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractError::Task(format!("Task join error: {}", e)))
}
