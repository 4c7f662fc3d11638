//! Calendar retrieval: fetch ICS text over HTTP or from disk and hand it
//! to the [`koyomi_ical`] decoder.
//!
//! Retrieval is the only fallible step; once text is in hand, decoding is
//! tolerant and always produces a document.

use std::path::Path;

use koyomi_ical::CalendarDocument;

mod error;

pub use error::FetchError;

/// Downloads ICS text from `url` and decodes it.
///
/// Non-success HTTP statuses are reported as [`FetchError::Status`] rather
/// than being decoded, since error pages are rarely valid calendars.
pub async fn from_url(url: &str) -> Result<CalendarDocument, FetchError> {
    tracing::debug!(url, "fetching calendar");
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }
    let body = response.text().await?;
    Ok(koyomi_ical::parse(&body))
}

/// Reads ICS text from `path` and decodes it.
pub async fn from_file(path: impl AsRef<Path>) -> Result<CalendarDocument, FetchError> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(koyomi_ical::parse(&text))
}

/// Blocking variant of [`from_file`] for callers without a runtime.
pub fn from_file_sync(path: impl AsRef<Path>) -> Result<CalendarDocument, FetchError> {
    let text = std::fs::read_to_string(path)?;
    Ok(koyomi_ical::parse(&text))
}
