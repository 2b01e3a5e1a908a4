use std::sync::Arc;

use tracing::{error, info};

use crate::delivery::{
    ConfirmationMessage, DeliveryError, DeliveryJob, DeliveryOutcome, DeliveryTransport,
    TicketRenderer,
};

/// Renders and sends one ticket. Every failure ends here as a
/// [`DeliveryOutcome::Failed`]; no error or panic leaves `dispatch`.
#[derive(Clone)]
pub struct DeliveryDispatcher {
    transport: Arc<dyn DeliveryTransport>,
    renderer: TicketRenderer,
}

impl DeliveryDispatcher {
    pub fn new(transport: Arc<dyn DeliveryTransport>) -> Self {
        Self {
            transport,
            renderer: TicketRenderer::new(),
        }
    }

    pub async fn dispatch(&self, job: &DeliveryJob) -> DeliveryOutcome {
        match self.try_dispatch(job).await {
            Ok(()) => {
                info!(
                    registration_id = %job.registration_id,
                    event_id = %job.event_id,
                    recipient = %job.recipient_email,
                    "Ticket delivered"
                );
                DeliveryOutcome::Sent
            }
            Err(e) => {
                error!(
                    registration_id = %job.registration_id,
                    event_id = %job.event_id,
                    recipient = %job.recipient_email,
                    error = %e,
                    "Ticket delivery failed"
                );
                DeliveryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_dispatch(&self, job: &DeliveryJob) -> Result<(), DeliveryError> {
        let qr_data_url = self.renderer.render_data_url(&job.ticket_token)?;
        let message = ConfirmationMessage::compose(job, &qr_data_url);

        self.transport
            .send(&job.recipient_email, &message.subject, &message.html)
            .await
    }
}
