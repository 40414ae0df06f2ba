//! Deployment notification

pub mod notifier;
