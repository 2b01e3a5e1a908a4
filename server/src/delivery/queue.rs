use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::delivery::{DeliveryDispatcher, DeliveryJob};

/// Producer side of the delivery pipeline. Cloned into every service that
/// issues tickets.
#[derive(Clone)]
pub struct DeliveryQueue {
    sender: mpsc::Sender<DeliveryJob>,
}

impl DeliveryQueue {
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<DeliveryJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Never waits. A full or closed queue drops the job with a warning,
    /// since delivery is best effort.
    pub fn enqueue(&self, job: DeliveryJob) -> bool {
        match self.sender.try_send(job) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                warn!(
                    registration_id = %job.registration_id,
                    event_id = %job.event_id,
                    recipient = %job.recipient_email,
                    "Delivery queue full, ticket will not be sent"
                );
                false
            }
            Err(TrySendError::Closed(job)) => {
                warn!(
                    registration_id = %job.registration_id,
                    event_id = %job.event_id,
                    recipient = %job.recipient_email,
                    "Delivery worker stopped, ticket will not be sent"
                );
                false
            }
        }
    }
}

/// Consumes the queue until every [`DeliveryQueue`] handle is dropped.
pub struct DeliveryWorker {
    receiver: mpsc::Receiver<DeliveryJob>,
    dispatcher: DeliveryDispatcher,
}

impl DeliveryWorker {
    pub fn new(receiver: mpsc::Receiver<DeliveryJob>, dispatcher: DeliveryDispatcher) -> Self {
        Self {
            receiver,
            dispatcher,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        info!("Delivery worker started");

        while let Some(job) = self.receiver.recv().await {
            let registration_id = job.registration_id;
            let dispatcher = self.dispatcher.clone();

            // A panicking transport takes down its own task, not the worker.
            let handle = tokio::spawn(async move { dispatcher.dispatch(&job).await });
            match handle.await {
                Ok(outcome) => debug!(%registration_id, ?outcome, "Delivery attempt finished"),
                Err(e) => error!(%registration_id, error = %e, "Delivery task aborted"),
            }
        }

        info!("Delivery worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingTransport;
    use chrono::Utc;
    use std::sync::Arc;
    use uuid::Uuid;

    fn job(email: &str) -> DeliveryJob {
        DeliveryJob {
            registration_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            recipient_email: email.to_string(),
            attendee_name: "Test".to_string(),
            event_title: "Queue Night".to_string(),
            event_start: Utc::now(),
            event_location: "Basement".to_string(),
            ticket_token: format!("tok:{email}"),
        }
    }

    #[tokio::test]
    async fn test_worker_drains_queue_then_stops() {
        let transport = Arc::new(RecordingTransport::new());
        let (queue, receiver) = DeliveryQueue::bounded(8);
        let worker = DeliveryWorker::new(receiver, DeliveryDispatcher::new(transport.clone()));

        assert!(queue.enqueue(job("a@example.com")));
        assert!(queue.enqueue(job("b@example.com")));
        drop(queue);

        worker.run().await;

        let recipients: Vec<String> = transport
            .sent()
            .await
            .into_iter()
            .map(|m| m.recipient)
            .collect();
        assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_full_queue_drops_job() {
        let (queue, _receiver) = DeliveryQueue::bounded(1);
        assert!(queue.enqueue(job("a@example.com")));
        assert!(!queue.enqueue(job("b@example.com")));
    }

    #[tokio::test]
    async fn test_closed_queue_drops_job() {
        let (queue, receiver) = DeliveryQueue::bounded(4);
        drop(receiver);
        assert!(!queue.enqueue(job("a@example.com")));
    }
}
