//! Event parameter and endpoint tests

use std::collections::HashSet;

use dtnotify::http::events::{EventPost, TokenPlacement};
use dtnotify::models::deployment::{
    DeploymentNotificationRequest, EventParams, EventProvenance, EVENT_TYPE_CUSTOM_DEPLOYMENT,
};

fn base_request() -> dtnotify::models::deployment::DeploymentRequestBuilder {
    DeploymentNotificationRequest::builder()
        .tenant_url("mytenant.live.dynatrace.com")
        .api_token("XXXXXXXX")
        .entity_id("APPLICATION-XXXXXXXXXX")
}

fn form_pairs(body: &str) -> HashSet<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[test]
fn test_required_only_has_constant_fields() {
    let request = base_request().build().unwrap();
    let params = EventParams::from_request(&request, &EventProvenance::default());

    assert_eq!(params.len(), 4);
    assert_eq!(
        params.keys().collect::<Vec<_>>(),
        vec!["eventType", "deploymentName", "deploymentProject", "source"]
    );
    assert_eq!(params.get("eventType"), Some(EVENT_TYPE_CUSTOM_DEPLOYMENT));
    assert_eq!(params.get("deploymentName"), Some("Update"));
    assert_eq!(params.get("deploymentProject"), Some("My Project"));
    assert_eq!(params.get("source"), Some("Ansible"));
    assert_eq!(params.get("deploymentVersion"), None);
    assert_eq!(params.get("remediationAction"), None);
}

#[test]
fn test_optional_fields_included_verbatim() {
    let request = base_request()
        .deployment_version("2.0-rc.1")
        .remediation_action("Roll back to 1.9 & page on-call")
        .build()
        .unwrap();
    let params = EventParams::from_request(&request, &EventProvenance::default());

    assert_eq!(params.len(), 6);
    assert_eq!(params.get("deploymentVersion"), Some("2.0-rc.1"));
    assert_eq!(
        params.get("remediationAction"),
        Some("Roll back to 1.9 & page on-call")
    );
}

#[test]
fn test_only_remediation_action() {
    let request = base_request().remediation_action("restart").build().unwrap();
    let params = EventParams::from_request(&request, &EventProvenance::default());

    assert_eq!(params.len(), 5);
    assert_eq!(params.get("remediationAction"), Some("restart"));
    assert_eq!(params.get("deploymentVersion"), None);
}

#[test]
fn test_entity_id_not_transmitted() {
    let request = base_request().build().unwrap();
    let post = EventPost::new(
        &request,
        &EventProvenance::default(),
        TokenPlacement::QueryParameter,
    )
    .unwrap();

    assert!(!post.body.contains("APPLICATION-XXXXXXXXXX"));
    assert!(!post.url.as_str().contains("APPLICATION-XXXXXXXXXX"));
}

#[test]
fn test_documented_scenario() {
    let request = base_request().deployment_version("2.0").build().unwrap();
    let post = EventPost::new(
        &request,
        &EventProvenance::default(),
        TokenPlacement::QueryParameter,
    )
    .unwrap();

    assert_eq!(
        post.url.as_str(),
        "https://mytenant.live.dynatrace.com/api/v1/events/?Api-Token=XXXXXXXX"
    );
    assert!(post.authorization.is_none());
    assert_eq!(
        form_pairs(&post.body),
        form_pairs(
            "eventType=CUSTOM_DEPLOYMENT&deploymentName=Update&deploymentProject=My+Project\
             &source=Ansible&deploymentVersion=2.0"
        )
    );
    assert!(post.body.contains("deploymentProject=My+Project"));
}

#[test]
fn test_custom_provenance() {
    let provenance = EventProvenance {
        deployment_name: "Release 42".to_string(),
        deployment_project: "Checkout".to_string(),
        source: "GitLab CI".to_string(),
    };
    let request = base_request().build().unwrap();
    let params = EventParams::from_request(&request, &provenance);

    assert_eq!(params.len(), 4);
    assert_eq!(params.get("deploymentName"), Some("Release 42"));
    assert_eq!(params.get("deploymentProject"), Some("Checkout"));
    assert_eq!(params.get("source"), Some("GitLab CI"));
    assert_eq!(params.get("eventType"), Some("CUSTOM_DEPLOYMENT"));
}

#[test]
fn test_header_token_placement() {
    use secrecy::ExposeSecret;

    let request = base_request().build().unwrap();
    let post = EventPost::new(&request, &EventProvenance::default(), TokenPlacement::Header)
        .unwrap();

    assert_eq!(
        post.url.as_str(),
        "https://mytenant.live.dynatrace.com/api/v1/events/"
    );
    assert_eq!(
        post.authorization.as_ref().unwrap().expose_secret(),
        "Api-Token XXXXXXXX"
    );
    assert!(!format!("{:?}", post).contains("XXXXXXXX"));
}

#[test]
fn test_missing_required_fields() {
    let cases = [
        DeploymentNotificationRequest::builder()
            .api_token("t")
            .entity_id("e"),
        DeploymentNotificationRequest::builder()
            .tenant_url("h")
            .entity_id("e"),
        DeploymentNotificationRequest::builder()
            .tenant_url("h")
            .api_token("t"),
        DeploymentNotificationRequest::builder()
            .tenant_url("  ")
            .api_token("t")
            .entity_id("e"),
    ];

    for builder in cases {
        let err = builder.build().unwrap_err();
        assert!(err.is_config(), "expected configuration error, got {err}");
    }
}

#[test]
fn test_uppercase_scheme_keeps_tenant_host() {
    let request = base_request()
        .tenant_url("HTTPS://mytenant.live.dynatrace.com/")
        .build()
        .unwrap();
    let post = EventPost::new(
        &request,
        &EventProvenance::default(),
        TokenPlacement::QueryParameter,
    )
    .unwrap();

    assert_eq!(post.url.host_str(), Some("mytenant.live.dynatrace.com"));
    assert_eq!(post.url.scheme(), "https");
    assert_eq!(post.url.path(), "/api/v1/events/");
}

#[test]
fn test_non_https_scheme_is_config_error() {
    let err = base_request()
        .tenant_url("ftp://mytenant.live.dynatrace.com")
        .build()
        .unwrap_err();
    assert!(err.is_config(), "expected configuration error, got {err}");
}
