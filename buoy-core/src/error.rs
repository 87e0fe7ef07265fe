//! Error types for NDBC client operations

use thiserror::Error;

use crate::dataset::Dataset;

/// Result type alias for NDBC client operations
pub type Result<T> = std::result::Result<T, NdbcError>;

/// Errors that can occur while talking to NDBC / NWS endpoints
#[derive(Error, Debug)]
pub enum NdbcError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// Response body was not the XML document we expected
    #[error("Failed to parse XML response: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Body parsed as XML but is not the expected document type
    #[error("Expected a <{0}> document")]
    UnexpectedDocument(&'static str),

    /// Realtime body lacks the column header of the requested dataset
    #[error("Not a {dataset} realtime file: {reason}")]
    MalformedRealtime {
        dataset: Dataset,
        reason: &'static str,
    },

    /// Dataset selector not recognised
    #[error(
        "Unknown dataset '{0}'. Supported datasets: txt (meteorological), spec (wave summary)."
    )]
    UnknownDataset(String),
}

impl NdbcError {
    pub fn status(status: u16, url: impl Into<String>, body: &str) -> Self {
        Self::Status {
            status,
            url: url.into(),
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_truncates_long_bodies() {
        let body = "x".repeat(500);
        let err = NdbcError::status(404, "https://example.test/41013.txt", &body);

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("41013.txt"));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300);
    }

    #[test]
    fn malformed_realtime_names_the_dataset() {
        let err = NdbcError::MalformedRealtime {
            dataset: Dataset::WaveSummary,
            reason: "missing column header",
        };
        assert_eq!(err.to_string(), "Not a spec realtime file: missing column header");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
    }
}
