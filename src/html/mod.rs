//! HTML processing module
//!
//! Converts fetched job announcement pages to plain text.
//!
//! Uses lol_html for efficient streaming HTML processing.

mod text;

pub use text::{html_to_text, HtmlError};
