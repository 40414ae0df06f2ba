//! dtnotify
//!
//! Sends a deployment event to a Dynatrace tenant so subsequent anomalies can
//! be correlated with the release that caused them.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod notify;
pub mod storage;
pub mod utils;
