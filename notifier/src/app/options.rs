//! Application configuration options

use std::time::Duration;

use crate::http::client::ClientOptions;
use crate::http::events::TokenPlacement;
use crate::logs::LogOptions;
use crate::models::deployment::{DeploymentRequestBuilder, EventProvenance};

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Caller input for the event, validated when the run starts
    pub request: DeploymentRequestBuilder,

    /// Provenance tags attached to the event
    pub provenance: EventProvenance,

    /// Where the API token is sent
    pub token_placement: TokenPlacement,

    /// Prepare the event without sending it
    pub dry_run: bool,

    /// HTTP request timeout
    pub timeout: Duration,

    /// Result report format
    pub output: OutputFormat,

    /// Logging options
    pub log: LogOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            request: DeploymentRequestBuilder::default(),
            provenance: EventProvenance::default(),
            token_placement: TokenPlacement::QueryParameter,
            dry_run: false,
            timeout: DEFAULT_TIMEOUT,
            output: OutputFormat::Json,
            log: LogOptions::default(),
        }
    }
}

impl AppOptions {
    /// Client options for the live request
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout,
            validate_certs: self.request.validate_certs,
        }
    }
}

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object
    #[default]
    Json,
    /// Human readable line
    Text,
}
