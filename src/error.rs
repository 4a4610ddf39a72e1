use thiserror::Error;

/// Errors surfaced to the caller of the assistant.
///
/// Only bad input is fatal to a request: provider and storage failures are
/// absorbed by the selector and reported as warnings on the reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    InvalidInput,
}

/// Failure of a remote completion call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("provider returned no reply text")]
    EmptyReply,
}
