//! Error types for courier.

use std::fmt;

/// What kind of unit a transmission was working on when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A text chunk (text mode).
    Chunk,
    /// A file batch (file mode).
    Batch,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Chunk => f.write_str("chunk"),
            Unit::Batch => f.write_str("batch"),
        }
    }
}

/// Errors that can occur while relaying content.
///
/// Every variant is fatal for the run that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured limit was zero.
    #[error("invalid {name}: {value} (must be > 0)")]
    InvalidLimit {
        /// Which limit.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// No webhook endpoint was configured.
    #[error("webhook endpoint is not set (export {var})")]
    MissingEndpoint {
        /// The environment variable that should hold it.
        var: &'static str,
    },

    /// The webhook endpoint is not a valid URL.
    #[error("invalid webhook endpoint {url:?}: {reason}")]
    InvalidEndpoint {
        /// The rejected value.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// A file could not be opened.
    #[error("cannot open {name}")]
    Open {
        /// Logical file name (the path as given).
        name: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file could not be read after opening.
    #[error("cannot read {name}")]
    Read {
        /// Logical file name (the path as given).
        name: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Standard input could not be read.
    #[error("cannot read standard input")]
    Stdin(#[source] std::io::Error),

    /// A payload could not be serialized.
    #[error("cannot encode payload")]
    Encode(#[from] serde_json::Error),

    /// Building, sending, or reading a request failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A response body could not be written out.
    #[error("cannot write response")]
    Output(#[source] std::io::Error),

    /// One chunk or batch failed; nothing after it was sent.
    #[error("{unit} {} of {total} failed", .index + 1)]
    Aborted {
        /// Chunk or batch.
        unit: Unit,
        /// Zero-based index of the failing unit.
        index: usize,
        /// How many units the run had.
        total: usize,
        /// What went wrong.
        source: Box<Error>,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl Error {
    /// The zero-based chunk or batch index this error aborted at, if any.
    #[must_use]
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            Error::Aborted { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result type for courier operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_aborted_message_is_one_based() {
        let err = Error::Aborted {
            unit: Unit::Batch,
            index: 1,
            total: 3,
            source: Box::new(Error::Transport("connection reset".into())),
        };
        assert_eq!(err.to_string(), "batch 2 of 3 failed");

        let chain: Vec<String> = std::iter::successors(
            Some(&err as &(dyn std::error::Error + 'static)),
            |e| (*e).source(),
        )
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            chain,
            ["batch 2 of 3 failed", "transport error", "connection reset"]
        );
        assert_eq!(err.failed_index(), Some(1));
    }

    #[test]
    fn test_missing_endpoint_names_variable() {
        let err = Error::MissingEndpoint {
            var: "DISCORD_WEBHOOK_URL",
        };
        assert!(err.to_string().contains("DISCORD_WEBHOOK_URL"));
        assert_eq!(err.failed_index(), None);
    }
}
