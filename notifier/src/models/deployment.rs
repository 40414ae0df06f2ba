//! Deployment event models

use secrecy::SecretString;
use tracing::warn;
use url::form_urlencoded;

use crate::errors::NotifierError;

/// Event type attached to every deployment notification
pub const EVENT_TYPE_CUSTOM_DEPLOYMENT: &str = "CUSTOM_DEPLOYMENT";

pub const KEY_EVENT_TYPE: &str = "eventType";
pub const KEY_DEPLOYMENT_NAME: &str = "deploymentName";
pub const KEY_DEPLOYMENT_PROJECT: &str = "deploymentProject";
pub const KEY_SOURCE: &str = "source";
pub const KEY_DEPLOYMENT_VERSION: &str = "deploymentVersion";
pub const KEY_REMEDIATION_ACTION: &str = "remediationAction";

/// A validated deployment notification.
///
/// Built once per invocation through [`DeploymentRequestBuilder`] and never
/// mutated afterwards.
#[derive(Debug)]
pub struct DeploymentNotificationRequest {
    tenant_url: String,
    api_token: SecretString,
    entity_id: String,
    deployment_version: Option<String>,
    remediation_action: Option<String>,
    validate_certs: bool,
}

impl DeploymentNotificationRequest {
    pub fn builder() -> DeploymentRequestBuilder {
        DeploymentRequestBuilder::default()
    }

    /// Tenant host (and optional path), without scheme or trailing slash
    pub fn tenant_url(&self) -> &str {
        &self.tenant_url
    }

    pub fn api_token(&self) -> &SecretString {
        &self.api_token
    }

    /// Affected entity. Validated but not part of the outgoing event.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn deployment_version(&self) -> Option<&str> {
        self.deployment_version.as_deref()
    }

    pub fn remediation_action(&self) -> Option<&str> {
        self.remediation_action.as_deref()
    }

    pub fn validate_certs(&self) -> bool {
        self.validate_certs
    }
}

/// Caller input for a deployment notification, validated by [`build`](Self::build)
#[derive(Debug)]
pub struct DeploymentRequestBuilder {
    pub tenant_url: Option<String>,
    pub api_token: Option<SecretString>,
    pub entity_id: Option<String>,
    pub deployment_version: Option<String>,
    pub remediation_action: Option<String>,
    /// Disabling certificate validation accepts any certificate the tenant
    /// presents, including self-signed and man-in-the-middle ones.
    pub validate_certs: bool,
}

impl Default for DeploymentRequestBuilder {
    fn default() -> Self {
        Self {
            tenant_url: None,
            api_token: None,
            entity_id: None,
            deployment_version: None,
            remediation_action: None,
            validate_certs: true,
        }
    }
}

impl DeploymentRequestBuilder {
    pub fn tenant_url(mut self, tenant_url: impl Into<String>) -> Self {
        self.tenant_url = Some(tenant_url.into());
        self
    }

    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(api_token.into()));
        self
    }

    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn deployment_version(mut self, version: impl Into<String>) -> Self {
        self.deployment_version = Some(version.into());
        self
    }

    pub fn remediation_action(mut self, action: impl Into<String>) -> Self {
        self.remediation_action = Some(action.into());
        self
    }

    pub fn validate_certs(mut self, validate_certs: bool) -> Self {
        self.validate_certs = validate_certs;
        self
    }

    /// Validate the input and produce an immutable request.
    ///
    /// Fails with [`NotifierError::ConfigError`] when `tenant_url`, `api_token`
    /// or `entity_id` is missing or blank. Blank optional fields are dropped.
    pub fn build(self) -> Result<DeploymentNotificationRequest, NotifierError> {
        use secrecy::ExposeSecret;

        let tenant_url = normalize_tenant_url(&required("tenant_url", self.tenant_url)?)?;

        let api_token = match self.api_token {
            Some(token) if !token.expose_secret().trim().is_empty() => token,
            _ => return Err(missing("api_token")),
        };

        let entity_id = required("entity_id", self.entity_id)?;

        Ok(DeploymentNotificationRequest {
            tenant_url,
            api_token,
            entity_id,
            deployment_version: optional(self.deployment_version),
            remediation_action: optional(self.remediation_action),
            validate_certs: self.validate_certs,
        })
    }
}

fn missing(field: &str) -> NotifierError {
    NotifierError::ConfigError(format!("{} must be set", field))
}

fn required(field: &str, value: Option<String>) -> Result<String, NotifierError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(missing(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Strip a scheme and trailing slashes from the tenant URL.
///
/// The events endpoint is always reached over https.
pub fn normalize_tenant_url(raw: &str) -> Result<String, NotifierError> {
    let mut tenant = raw.trim();

    for scheme in ["https://", "http://"] {
        let matches = tenant
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme));
        if matches {
            warn!("tenant_url should not carry a scheme, ignoring {:?}", scheme);
            tenant = &tenant[scheme.len()..];
            break;
        }
    }

    if tenant.contains("://") {
        return Err(NotifierError::ConfigError(format!(
            "tenant_url {:?} uses an unsupported scheme, only https is allowed",
            raw
        )));
    }

    let tenant = tenant.trim_end_matches('/');
    if tenant.is_empty() {
        return Err(NotifierError::ConfigError(format!(
            "tenant_url {:?} does not name a host",
            raw
        )));
    }
    if tenant.contains(char::is_whitespace) || tenant.contains(['?', '#']) {
        return Err(NotifierError::ConfigError(format!(
            "tenant_url {:?} must be a host with an optional path",
            raw
        )));
    }

    Ok(tenant.to_string())
}

/// Fixed provenance tags identifying who reported the deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProvenance {
    pub deployment_name: String,
    pub deployment_project: String,
    pub source: String,
}

impl Default for EventProvenance {
    fn default() -> Self {
        Self {
            deployment_name: "Update".to_string(),
            deployment_project: "My Project".to_string(),
            source: "Ansible".to_string(),
        }
    }
}

/// Outgoing form parameters of a deployment event, in wire order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParams {
    pairs: Vec<(&'static str, String)>,
}

impl EventParams {
    /// Assemble the parameter set: the constant fields first, then the
    /// optional fields the caller supplied.
    pub fn from_request(
        request: &DeploymentNotificationRequest,
        provenance: &EventProvenance,
    ) -> Self {
        let mut pairs = vec![
            (KEY_EVENT_TYPE, EVENT_TYPE_CUSTOM_DEPLOYMENT.to_string()),
            (KEY_DEPLOYMENT_NAME, provenance.deployment_name.clone()),
            (KEY_DEPLOYMENT_PROJECT, provenance.deployment_project.clone()),
            (KEY_SOURCE, provenance.source.clone()),
        ];

        if let Some(version) = request.deployment_version() {
            pairs.push((KEY_DEPLOYMENT_VERSION, version.to_string()));
        }
        if let Some(action) = request.remediation_action() {
            pairs.push((KEY_REMEDIATION_ACTION, action.to_string()));
        }

        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as an `application/x-www-form-urlencoded` body
    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}
