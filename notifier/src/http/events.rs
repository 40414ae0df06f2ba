//! Dynatrace events API (v1)
//!
//! `POST https://{tenant}/api/v1/events/?Api-Token={token}` with a form
//! encoded body. The tenant answers 200 or 201 on acceptance.

use std::fmt;

use http::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::NotifierError;
use crate::models::deployment::{DeploymentNotificationRequest, EventParams, EventProvenance};
use crate::models::outcome::NotificationOutcome;
use crate::utils::mask;

pub const EVENTS_API_PATH: &str = "/api/v1/events/";
pub const TOKEN_QUERY_PARAM: &str = "Api-Token";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Where the API token travels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPlacement {
    /// `?Api-Token=<token>` on the endpoint URL
    #[default]
    QueryParameter,
    /// `Authorization: Api-Token <token>` header
    Header,
}

/// Compose the events endpoint for a tenant
pub fn endpoint(
    tenant_url: &str,
    api_token: &SecretString,
    placement: TokenPlacement,
) -> Result<Url, NotifierError> {
    let mut url = Url::parse(&format!("https://{}{}", tenant_url, EVENTS_API_PATH))?;

    if placement == TokenPlacement::QueryParameter {
        url.query_pairs_mut()
            .append_pair(TOKEN_QUERY_PARAM, api_token.expose_secret());
    }

    Ok(url)
}

/// Render an endpoint with the token value masked
pub fn redact_endpoint(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == TOKEN_QUERY_PARAM {
                mask(&v).to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// A fully prepared event submission
pub struct EventPost {
    pub url: Url,
    pub body: String,
    /// Value for the `Authorization` header, when the token travels there
    pub authorization: Option<SecretString>,
}

impl EventPost {
    pub fn new(
        request: &DeploymentNotificationRequest,
        provenance: &EventProvenance,
        placement: TokenPlacement,
    ) -> Result<Self, NotifierError> {
        let url = endpoint(request.tenant_url(), request.api_token(), placement)?;
        let body = EventParams::from_request(request, provenance).to_form_body();

        let authorization = match placement {
            TokenPlacement::Header => Some(SecretString::from(format!(
                "Api-Token {}",
                request.api_token().expose_secret()
            ))),
            TokenPlacement::QueryParameter => None,
        };

        Ok(Self {
            url,
            body,
            authorization,
        })
    }
}

impl fmt::Debug for EventPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPost")
            .field("url", &redact_endpoint(&self.url))
            .field("body", &self.body)
            .field("authorization", &self.authorization)
            .finish()
    }
}

/// Raw answer from the tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Map a tenant response to an outcome
pub fn classify(response: &TransportResponse) -> NotificationOutcome {
    if matches!(response.status, StatusCode::OK | StatusCode::CREATED) {
        return NotificationOutcome::Success;
    }

    let rejection = NotifierError::ServerRejection {
        status: response.status.as_u16(),
        message: server_message(response),
    };
    NotificationOutcome::Failure {
        message: rejection.to_string(),
    }
}

/// Best available description of a rejection
pub fn server_message(response: &TransportResponse) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&response.body) {
        if let Some(message) = parsed.error.message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }

    let body = response.body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    response
        .status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}
