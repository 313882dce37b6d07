//! HTTP client for the moving server label API

use reqwest::StatusCode;

use crate::config::PrinterConfig;
use crate::error::{PrinterError, PrinterResult};

/// Thin client over the label endpoints of the moving server.
pub struct ServerClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl ServerClient {
    pub fn new(config: &PrinterConfig) -> PrinterResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.server_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Open the long-lived label-event stream.
    ///
    /// The body is a newline-delimited sequence of label ids; the
    /// connection stays open until the server shuts down or we drop it.
    pub async fn subscribe_events(&self) -> PrinterResult<reqwest::Response> {
        let response = self
            .http
            .get(format!("{}/api/labels/events", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(PrinterError::Unauthorized),
            StatusCode::CONFLICT => Err(PrinterError::StreamBusy),
            status => Err(PrinterError::UnexpectedStatus(status)),
        }
    }

    /// Fetch the PDF bytes for one label.
    ///
    /// Returns `None` when the artifact does not exist; a reprint of a
    /// label whose document was never stored publishes an id with no
    /// bytes behind it, and that id is simply skipped.
    pub async fn fetch_label(&self, id: i64) -> PrinterResult<Option<Vec<u8>>> {
        let response = self
            .http
            .get(format!("{}/api/labels/{id}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.bytes().await?.to_vec())),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED => Err(PrinterError::Unauthorized),
            status => Err(PrinterError::UnexpectedStatus(status)),
        }
    }
}

/// Reassembles newline-delimited label ids from arbitrary byte chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns every id completed by it.
    ///
    /// Lines that do not parse as an integer are logged and dropped
    /// rather than tearing down the stream.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<i64> {
        self.pending.extend_from_slice(chunk);

        let mut ids = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<i64>() {
                Ok(id) => ids.push(id),
                Err(_) => tracing::warn!(line = %line, "ignoring malformed event line"),
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_lines() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"1\n2\n3\n"), vec![1, 2, 3]);
    }

    #[test]
    fn holds_partial_line_until_terminated() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"12"), Vec::<i64>::new());
        assert_eq!(buf.push(b"3\n4"), vec![123]);
        assert_eq!(buf.push(b"\n"), vec![4]);
    }

    #[test]
    fn skips_malformed_and_blank_lines() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"\nnot-a-number\n7\n"), vec![7]);
    }
}
