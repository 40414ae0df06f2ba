//! End-to-end run tests with a recording transport

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;

use dtnotify::app::options::AppOptions;
use dtnotify::app::run::{run, run_with_transport};
use dtnotify::errors::NotifierError;
use dtnotify::http::client::EventTransport;
use dtnotify::http::events::{EventPost, TransportResponse};
use dtnotify::models::deployment::DeploymentNotificationRequest;
use dtnotify::models::outcome::exit_code;

/// Counts calls and always answers with the same status
struct CountingTransport {
    status: StatusCode,
    calls: AtomicUsize,
}

impl CountingTransport {
    fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::from_u16(status).unwrap(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventTransport for CountingTransport {
    async fn post_form(&self, _post: &EventPost) -> Result<TransportResponse, NotifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TransportResponse {
            status: self.status,
            body: String::new(),
        })
    }
}

fn options() -> AppOptions {
    AppOptions {
        request: DeploymentNotificationRequest::builder()
            .tenant_url("mytenant.live.dynatrace.com")
            .api_token("XXXXXXXX")
            .entity_id("APPLICATION-XXXXXXXXXX"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_missing_required_field_makes_no_call() {
    for field in ["tenant_url", "api_token", "entity_id"] {
        let mut options = options();
        match field {
            "tenant_url" => options.request.tenant_url = None,
            "api_token" => options.request.api_token = None,
            _ => options.request.entity_id = None,
        }

        let transport = CountingTransport::new(200);
        let result = run_with_transport(options, transport.clone()).await;

        assert_eq!(transport.calls(), 0, "{field}");
        assert!(result.failed);
        assert!(!result.changed);
        assert!(result.is_config_error());
        assert_eq!(result.exit_code(), exit_code::CONFIG_ERROR);
        assert_eq!(
            result.msg.as_deref(),
            Some(format!("Configuration error: {} must be set", field).as_str())
        );
    }
}

#[tokio::test]
async fn test_success_reports_changed() {
    let transport = CountingTransport::new(201);
    let result = run_with_transport(options(), transport.clone()).await;

    assert_eq!(transport.calls(), 1);
    assert!(result.changed);
    assert!(!result.failed);
    assert_eq!(result.exit_code(), exit_code::SUCCESS);
    assert_eq!(result.to_json().unwrap(), r#"{"changed":true,"failed":false}"#);
}

#[tokio::test]
async fn test_rejection_reports_failed() {
    let transport = CountingTransport::new(403);
    let result = run_with_transport(options(), transport.clone()).await;

    assert_eq!(transport.calls(), 1);
    assert!(result.failed);
    assert_eq!(result.exit_code(), exit_code::FAILURE);
    assert_eq!(
        result.msg.as_deref(),
        Some("unable to send deployment event to Dynatrace: Server rejected event: 403: Forbidden")
    );
}

#[tokio::test]
async fn test_dry_run_reports_changed_without_call() {
    let transport = CountingTransport::new(500);
    let result = run_with_transport(
        AppOptions {
            dry_run: true,
            ..options()
        },
        transport.clone(),
    )
    .await;

    assert_eq!(transport.calls(), 0);
    assert!(result.changed);
    assert!(result.dry_run);
    assert_eq!(result.exit_code(), exit_code::SUCCESS);
}

#[tokio::test]
async fn test_dry_run_still_validates() {
    let transport = CountingTransport::new(200);
    let mut options = AppOptions {
        dry_run: true,
        ..options()
    };
    options.request.entity_id = Some(String::new());

    let result = run_with_transport(options, transport.clone()).await;
    assert_eq!(transport.calls(), 0);
    assert!(result.is_config_error());
}

#[tokio::test]
async fn test_unreachable_tenant_reports_transport_failure() {
    let mut options = AppOptions {
        timeout: std::time::Duration::from_secs(5),
        ..options()
    };
    options.request.tenant_url = Some("127.0.0.1:1".to_string());

    let result = run(options).await;
    assert!(result.failed);
    assert!(!result.is_config_error());
    assert_eq!(result.exit_code(), exit_code::FAILURE);
    let msg = result.msg.unwrap();
    assert!(msg.starts_with("unable to send deployment event to Dynatrace: "));
    assert!(!msg.contains("XXXXXXXX"));
}
