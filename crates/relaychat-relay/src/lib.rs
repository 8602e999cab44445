//! Relay server for relaychat.
//!
//! A stateless forwarder in front of the upstream chat API: it rewrites
//! legacy role names, attaches the server-held API key, and hands the
//! upstream answer back unchanged.
//!
//! # Architecture
//!
//! - [`forwarder::Relay`]: upstream HTTP client and role normalization
//! - [`server`]: `POST /api/chat` axum endpoint
//! - [`error::RelayError`]: failures, all rendered as HTTP 500

pub mod error;
pub mod forwarder;
pub mod server;

pub use error::RelayError;
pub use forwarder::{Relay, RelayMessage, RelayRequest};
pub use server::{router, serve};
