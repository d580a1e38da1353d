//! CV Match Server Library
//!
//! Backend for matching CVs against job announcements with a local LLM.
//!
//! # Modules
//!
//! - `llm`: Ollama gateway (`/api/generate`, single attempt, 120 s timeout)
//! - `extract`: PDF / DOCX / plain-text extraction with OCR fallback for scanned PDFs
//! - `ocr`: Tesseract and Ollama vision OCR providers
//! - `job`: job announcement fetching and the analysis prompt
//! - `routes`: axum HTTP surface

pub mod config;
pub mod error;
pub mod extract;
pub mod html;
pub mod job;
pub mod llm;
pub mod ocr;
pub mod routes;
pub mod state;
