//! # Errors
//!
//! Core errors are plain `thiserror` enums. The HTTP crate turns any of them
//! into a 500 with the display string as body, so messages are written to be
//! read by a client.

use std::path::PathBuf;

use thiserror::Error;

/// A convenience result type for nscdn core APIs.
pub type CdnResult<T> = std::result::Result<T, CdnError>;

#[derive(Error, Debug)]
pub enum CdnError {
    #[error("Corrupt record at {}:{line}: {source}", path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl CdnError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_client_readable() {
        let err = CdnError::config("http.port is not a port: abc");
        assert_eq!(err.to_string(), "Invalid configuration: http.port is not a port: abc");

        let io: CdnError = std::io::Error::other("disk full").into();
        assert_eq!(io.to_string(), "I/O error: disk full");
    }
}
