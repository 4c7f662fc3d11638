use thiserror::Error;

/// Errors raised while retrieving calendar text.
///
/// Decoding itself never fails; only the transport around it can.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("calendar endpoint answered {status}")]
    Status { status: reqwest::StatusCode },

    /// The request failed before a usable response arrived.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The calendar file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
