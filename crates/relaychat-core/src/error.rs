//! Client-side error taxonomy.
//!
//! Every variant ends up as a single system message in the current chat;
//! nothing is retried. Relay-side failures (including a missing upstream
//! credential) reach the client as `UpstreamError` with status 500.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The relay could not be reached (connect, DNS, reset, ...).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The relay (or upstream behind it) answered with a non-2xx status.
    #[error("HTTP error! status: {status}, message: {body}")]
    UpstreamError { status: u16, body: String },

    /// An import file was not a non-empty mapping of group name to messages.
    #[error("invalid chat history format: {0}")]
    MalformedImport(String),

    /// The response JSON matched neither recognized reply shape.
    #[error("Unexpected response format")]
    UnexpectedResponseShape,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
