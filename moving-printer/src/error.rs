//! Printer client error types

use thiserror::Error;

/// Printer client error type
#[derive(Debug, Error)]
pub enum PrinterError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the configured credentials
    #[error("Authentication rejected by server")]
    Unauthorized,

    /// Another subscriber already holds the event stream
    #[error("Event stream busy: another printer client is connected")]
    StreamBusy,

    /// Server returned an unexpected status
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(http::StatusCode),

    /// Scratch file or spool I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The print command exited with a failure status
    #[error("print command failed with status {status}: {stderr}")]
    PrintCommand { status: String, stderr: String },
}

/// Result type for printer client operations
pub type PrinterResult<T> = Result<T, PrinterError>;
