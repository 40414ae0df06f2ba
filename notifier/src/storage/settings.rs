//! Settings file management
//!
//! Optional JSON file supplying defaults for anything not given on the
//! command line:
//!
//! ```json
//! {
//!   "log_level": "info",
//!   "tenant": {
//!     "url": "mytenant.live.dynatrace.com",
//!     "api_token": "dt0c01.XXXX",
//!     "validate_certs": true,
//!     "token_placement": "query-parameter",
//!     "timeout_secs": 30
//!   },
//!   "event": { "entity_id": "APPLICATION-XXXXXXXXXX" },
//!   "provenance": { "source": "GitLab CI" }
//! }
//! ```

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::errors::NotifierError;
use crate::filesys::file::File;
use crate::http::events::TokenPlacement;
use crate::logs::LogLevel;

/// Notifier settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub log_level: Option<LogLevel>,

    #[serde(default)]
    pub tenant: TenantSettings,

    #[serde(default)]
    pub event: EventSettings,

    #[serde(default)]
    pub provenance: ProvenanceSettings,
}

/// Tenant connection settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantSettings {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_token: Option<SecretString>,

    #[serde(default)]
    pub validate_certs: Option<bool>,

    #[serde(default)]
    pub token_placement: Option<TokenPlacement>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Per-event settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventSettings {
    #[serde(default)]
    pub entity_id: Option<String>,

    #[serde(default)]
    pub deployment_version: Option<String>,

    #[serde(default)]
    pub remediation_action: Option<String>,
}

/// Provenance tag overrides
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvenanceSettings {
    #[serde(default)]
    pub deployment_name: Option<String>,

    #[serde(default)]
    pub deployment_project: Option<String>,

    #[serde(default)]
    pub source: Option<String>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Settings {
    /// Load settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, NotifierError> {
        let file = File::new(path);
        if !file.exists().await {
            return Err(NotifierError::ConfigError(format!(
                "settings file {} does not exist",
                path.display()
            )));
        }

        let settings: Settings = file.read_json().await.map_err(|e| {
            NotifierError::ConfigError(format!(
                "unable to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        if settings.tenant.api_token.is_some() && file.is_shared().await? {
            warn!(
                "Settings file {} holds an API token and is readable by other users",
                path.display()
            );
        }

        debug!("Loaded settings from {}", file.path().display());
        Ok(settings)
    }
}
