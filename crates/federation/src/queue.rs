//! Outbound federation queue.
//!
//! Lifecycle code publishes [`FederationEvent`]s here and moves on; the
//! sender task consumes them. Publishing never blocks and never fails
//! the caller -- the contract is "message enqueued", not "peer
//! informed".

use tokio::sync::mpsc;

use crate::payload::{AddVideoPayload, RemoveVideoPayload, UpdateVideoPayload};

/// An outbound synchronization event.
#[derive(Debug, Clone)]
pub enum FederationEvent {
    /// Announce an owned video. `None` broadcasts to every known pod;
    /// `Some(host)` targets one peer, used to send the existing
    /// catalogue to a newly known pod.
    AddVideo {
        to_host: Option<String>,
        payload: AddVideoPayload,
    },
    /// Propagate a metadata change to all known pods.
    UpdateVideo(UpdateVideoPayload),
    /// Propagate a removal to all known pods.
    RemoveVideo(RemoveVideoPayload),
}

/// Producer handle for the outbound queue.
///
/// Cheaply cloneable; shared via the application state.
#[derive(Clone)]
pub struct FederationQueue {
    sender: mpsc::UnboundedSender<FederationEvent>,
}

impl FederationQueue {
    /// Create the queue, returning the producer handle and the receiver
    /// the sender task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FederationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Enqueue an event. If the sender task has shut down the event is
    /// logged and dropped -- federation is best-effort by contract.
    pub fn publish(&self, event: FederationEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::warn!(error = %e, "Federation queue closed; dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn remove_event() -> FederationEvent {
        FederationEvent::RemoveVideo(RemoveVideoPayload {
            name: "Demo".into(),
            remote_id: Uuid::from_u128(1),
            pod_host: "pod.example.com:9000".into(),
        })
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let (queue, mut receiver) = FederationQueue::new();
        queue.publish(remove_event());

        match receiver.recv().await.expect("should receive the event") {
            FederationEvent::RemoveVideo(payload) => {
                assert_eq!(payload.name, "Demo");
                assert_eq!(payload.remote_id, Uuid::from_u128(1));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn publish_after_receiver_dropped_does_not_panic() {
        let (queue, receiver) = FederationQueue::new();
        drop(receiver);
        queue.publish(remove_event());
    }
}
