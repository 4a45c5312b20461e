//! The town crier of application logs.
//!
//! Herald forwards log lines to Mattermost through one of two transports: a
//! stateless incoming-webhook POST, or an authenticated bot account that
//! must first resolve a human-given channel reference into the channel ID
//! the posting API requires. Resolution is the interesting part; see
//! [mattermost::resolve].

pub mod config;
pub mod logger;
pub mod mattermost;
