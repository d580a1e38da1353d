//! Job announcements
//!
//! Fetching postings from the web and building the CV analysis prompt.

mod fetcher;
mod prompt;

pub use fetcher::{FetchError, JobFetcher};
pub use prompt::build_analysis_prompt;
