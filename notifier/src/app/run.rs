//! Single notification run

use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::errors::NotifierError;
use crate::http::client::{ClientOptions, EventTransport, HttpClient};
use crate::models::deployment::DeploymentNotificationRequest;
use crate::models::outcome::{ModuleResult, NotificationOutcome};
use crate::notify::notifier::Notifier;

/// Run one notification over HTTP
pub async fn run(options: AppOptions) -> ModuleResult {
    let client_options = options.client_options();
    execute(options, |request| {
        let client = http_transport(request, client_options)?;
        Ok(Arc::new(client) as Arc<dyn EventTransport>)
    })
    .await
}

fn http_transport(
    request: &DeploymentNotificationRequest,
    client_options: ClientOptions,
) -> Result<HttpClient, NotifierError> {
    HttpClient::new(&ClientOptions {
        validate_certs: request.validate_certs(),
        ..client_options
    })
}

/// Run one notification through the given transport
pub async fn run_with_transport(
    options: AppOptions,
    transport: Arc<dyn EventTransport>,
) -> ModuleResult {
    execute(options, |_| Ok(transport)).await
}

async fn execute<F>(options: AppOptions, make_transport: F) -> ModuleResult
where
    F: FnOnce(&DeploymentNotificationRequest) -> Result<Arc<dyn EventTransport>, NotifierError>,
{
    let AppOptions {
        request,
        provenance,
        token_placement,
        dry_run,
        ..
    } = options;

    let outcome: Result<NotificationOutcome, NotifierError> = async {
        let request = request.build()?;
        let transport = make_transport(&request)?;
        let notifier = Notifier::new(transport, provenance, token_placement);

        info!("Notifying tenant {} of deployment", request.tenant_url());
        notifier.notify(&request, dry_run).await
    }
    .await;

    report(outcome, dry_run)
}

fn report(outcome: Result<NotificationOutcome, NotifierError>, dry_run: bool) -> ModuleResult {
    match outcome {
        Ok(outcome) => ModuleResult::from_outcome(&outcome, dry_run),
        Err(e) if e.is_config() => {
            error!("Invalid configuration: {}", e);
            ModuleResult::config_error(&e.to_string())
        }
        Err(e) => {
            error!("Failed to send deployment event: {}", e);
            ModuleResult::failed(&e.to_string())
        }
    }
}
