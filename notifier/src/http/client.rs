//! HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::{debug, error, warn};

use crate::errors::NotifierError;
use crate::http::events::{redact_endpoint, EventPost, TransportResponse, FORM_CONTENT_TYPE};
use crate::utils::user_agent;

/// Sends prepared events to a tenant
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Submit one event. Connection, TLS and timeout failures surface as
    /// [`NotifierError::TransportError`]; any HTTP status is returned as-is.
    async fn post_form(&self, post: &EventPost) -> Result<TransportResponse, NotifierError>;
}

/// HTTP client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound for the whole request
    pub timeout: Duration,

    /// Validate the tenant's TLS certificate
    pub validate_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            validate_certs: true,
        }
    }
}

/// HTTP client for the events API
pub struct HttpClient {
    client: Client,
    validate_certs: bool,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(options: &ClientOptions) -> Result<Self, NotifierError> {
        if !options.validate_certs {
            warn!("TLS certificate validation is disabled for this request");
        }

        let client = Client::builder()
            .use_rustls_tls()
            .timeout(options.timeout)
            .user_agent(user_agent())
            .danger_accept_invalid_certs(!options.validate_certs)
            .build()?;

        Ok(Self {
            client,
            validate_certs: options.validate_certs,
        })
    }

    /// Whether the tenant's certificate is checked
    pub fn validates_certs(&self) -> bool {
        self.validate_certs
    }
}

#[async_trait]
impl EventTransport for HttpClient {
    async fn post_form(&self, post: &EventPost) -> Result<TransportResponse, NotifierError> {
        let endpoint = redact_endpoint(&post.url);
        debug!("POST {}", endpoint);

        let mut request = self
            .client
            .post(post.url.clone())
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(post.body.clone());

        if let Some(authorization) = &post.authorization {
            let mut value = header::HeaderValue::from_str(authorization.expose_secret())
                .map_err(|_| {
                    NotifierError::ConfigError(
                        "api_token contains characters not allowed in a header".to_string(),
                    )
                })?;
            value.set_sensitive(true);
            request = request.header(header::AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(|e| {
            // reqwest puts the full URL, token included, into its errors
            let e = NotifierError::from(e.without_url());
            error!("HTTP POST {} failed: {}", endpoint, e);
            e
        })?;

        let status = response.status();
        let body = body_or_empty(status, response.text().await.map_err(|e| e.without_url()));

        debug!("POST {} answered {}", endpoint, status);
        Ok(TransportResponse { status, body })
    }
}

/// Response body, or empty when it cannot be read. The status alone decides
/// the outcome.
fn body_or_empty<E: std::fmt::Display>(status: StatusCode, body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => {
            warn!("Unable to read response body after {}: {}", status, e);
            String::new()
        }
    }
}
