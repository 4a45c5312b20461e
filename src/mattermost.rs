//! Everything that talks to a Mattermost instance.
//!
//! The structure mirrors the two transports: [webhook] is a single
//! unauthenticated POST, while [message] posts through the REST API and
//! leans on [resolve] to turn free-form channel references into IDs first.

pub mod api;
pub mod auth;
pub mod channel;
pub mod directory;
pub mod error;
pub mod message;
pub mod resolve;
#[cfg(test)]
pub mod testing;
pub mod webhook;
