//! Client Error Types
//!
//! Failures the board client can report to its caller. `Api` carries the
//! server's own `{error, category, status}` body so the message can be shown
//! to the user unchanged.

use thiserror::Error;

use crate::shared::SharedError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure talking to the REST API
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("{message}")]
    Api {
        status: u16,
        category: String,
        message: String,
    },

    /// Transport failure on the board socket
    #[error("Socket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The server refused a socket command
    #[error("{0}")]
    Rejected(String),

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error(transparent)]
    Serialization(#[from] SharedError),

    /// A protected call was made before login
    #[error("Not logged in")]
    NotAuthenticated,
}

impl ClientError {
    /// HTTP status of an `Api` error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.into())
    }
}
