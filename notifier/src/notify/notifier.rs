//! Send one deployment event and interpret the answer

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::NotifierError;
use crate::http::client::EventTransport;
use crate::http::events::{classify, redact_endpoint, EventPost, TokenPlacement};
use crate::models::deployment::{DeploymentNotificationRequest, EventProvenance};
use crate::models::outcome::NotificationOutcome;

/// Deployment notifier
pub struct Notifier {
    transport: Arc<dyn EventTransport>,
    provenance: EventProvenance,
    token_placement: TokenPlacement,
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn EventTransport>,
        provenance: EventProvenance,
        token_placement: TokenPlacement,
    ) -> Self {
        Self {
            transport,
            provenance,
            token_placement,
        }
    }

    /// Notify the tenant of a deployment.
    ///
    /// Configuration problems are returned as `Err` before any I/O. Transport
    /// failures and rejections are `Ok(NotificationOutcome::Failure)`. With
    /// `dry_run` the event is prepared but never sent.
    pub async fn notify(
        &self,
        request: &DeploymentNotificationRequest,
        dry_run: bool,
    ) -> Result<NotificationOutcome, NotifierError> {
        let post = EventPost::new(request, &self.provenance, self.token_placement)?;
        debug!("Event body: {}", post.body);

        warn!(
            "entity_id {} is accepted but not attached to the event",
            request.entity_id()
        );

        if dry_run {
            info!(
                "Dry run, not sending deployment event to {}",
                redact_endpoint(&post.url)
            );
            return Ok(NotificationOutcome::Success);
        }

        let response = match self.transport.post_form(&post).await {
            Ok(response) => response,
            Err(e @ NotifierError::TransportError(_)) => {
                return Ok(NotificationOutcome::Failure {
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let outcome = classify(&response);
        match &outcome {
            NotificationOutcome::Success => {
                info!("Deployment event accepted ({})", response.status)
            }
            NotificationOutcome::Failure { message } => {
                warn!("Deployment event rejected: {}", message)
            }
        }

        Ok(outcome)
    }
}
