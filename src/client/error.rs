use thiserror::Error;

use crate::comment::model::ContentError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("You must be signed in")]
    Unauthenticated,

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ContentError> for ClientError {
    fn from(e: ContentError) -> Self {
        ClientError::Validation(e.to_string())
    }
}
