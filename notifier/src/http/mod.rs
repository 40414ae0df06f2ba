//! HTTP transport and the events API

pub mod client;
pub mod events;
