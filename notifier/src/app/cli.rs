//! Command line interface

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;

use crate::app::options::{AppOptions, OutputFormat, DEFAULT_TIMEOUT};
use crate::http::events::TokenPlacement;
use crate::logs::{LogLevel, LogOptions};
use crate::models::deployment::{DeploymentRequestBuilder, EventProvenance};
use crate::storage::settings::Settings;

/// Notify a Dynatrace tenant that an application was deployed
#[derive(Parser)]
#[command(name = "dtnotify", version, long_version = crate::utils::LONG_VERSION)]
pub struct Args {
    /// Tenant host, e.g. mytenant.live.dynatrace.com (https is implied)
    #[arg(long, env = "DT_TENANT_URL")]
    pub tenant_url: Option<String>,

    /// API token with permission to ingest events
    #[arg(long, env = "DT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Affected entity, e.g. APPLICATION-XXXXXXXXXX
    #[arg(long, env = "DT_ENTITY_ID")]
    pub entity_id: Option<String>,

    /// Version being deployed
    #[arg(long, alias = "deploymentVersion")]
    pub deployment_version: Option<String>,

    /// Remediation action to suggest if problems follow this deployment
    #[arg(long, alias = "remediationAction")]
    pub remediation_action: Option<String>,

    /// Validate the tenant's TLS certificate (true/false, yes/no). Disabling it
    /// accepts any certificate and should only be used against self-signed tenants you control.
    #[arg(
        long,
        value_name = "BOOL",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub validate_certs: Option<bool>,

    /// Override the deploymentName tag [default: Update]
    #[arg(long)]
    pub deployment_name: Option<String>,

    /// Override the deploymentProject tag [default: My Project]
    #[arg(long)]
    pub deployment_project: Option<String>,

    /// Override the source tag [default: Ansible]
    #[arg(long)]
    pub source: Option<String>,

    /// Where to send the API token
    #[arg(long, value_enum)]
    pub token_placement: Option<TokenPlacement>,

    /// Request timeout in seconds [default: 30]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Validate and prepare the event without sending it
    #[arg(long, alias = "check")]
    pub dry_run: bool,

    /// JSON settings file providing defaults for the options above
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Result report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Write logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Merge command line values over settings file values over defaults
    pub fn into_options(self, settings: Settings) -> AppOptions {
        let Settings {
            log_level,
            tenant,
            event,
            provenance,
        } = settings;

        let defaults = EventProvenance::default();

        AppOptions {
            request: DeploymentRequestBuilder {
                tenant_url: self.tenant_url.or(tenant.url),
                api_token: self.api_token.map(SecretString::from).or(tenant.api_token),
                entity_id: self.entity_id.or(event.entity_id),
                deployment_version: self.deployment_version.or(event.deployment_version),
                remediation_action: self.remediation_action.or(event.remediation_action),
                validate_certs: self.validate_certs.or(tenant.validate_certs).unwrap_or(true),
            },
            provenance: EventProvenance {
                deployment_name: self
                    .deployment_name
                    .or(provenance.deployment_name)
                    .unwrap_or(defaults.deployment_name),
                deployment_project: self
                    .deployment_project
                    .or(provenance.deployment_project)
                    .unwrap_or(defaults.deployment_project),
                source: self
                    .source
                    .or(provenance.source)
                    .unwrap_or(defaults.source),
            },
            token_placement: self
                .token_placement
                .or(tenant.token_placement)
                .unwrap_or_default(),
            dry_run: self.dry_run,
            timeout: self
                .timeout_secs
                .or(tenant.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            output: self.output,
            log: LogOptions {
                log_level: self.log_level.or(log_level).unwrap_or_default(),
                json_format: self.log_json,
            },
        }
    }
}
