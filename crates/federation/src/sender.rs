//! Federation delivery task.
//!
//! Drains the outbound queue and POSTs each event to its target pods
//! with a small retry ladder. Every failure ends at a log line; nothing
//! here propagates back into the lifecycle operations that enqueued the
//! event.

use std::time::Duration;

use tokio::sync::mpsc;
use vidpod_db::repositories::PodRepo;
use vidpod_db::DbPool;

use crate::payload::RemoteVideoRequest;
use crate::queue::FederationEvent;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote-videos endpoint on peer pods.
const REMOTE_VIDEOS_PATH: &str = "/api/v1/remote/videos";

/// Error type for a single delivery attempt.
#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("peer returned HTTP {0}")]
    HttpStatus(u16),
}

/// Consumes the outbound queue and delivers events to peers.
pub struct FederationSender {
    client: reqwest::Client,
    pool: DbPool,
    /// Scheme used to address peers, `http` or `https`.
    scheme: String,
}

impl FederationSender {
    pub fn new(pool: DbPool, scheme: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            pool,
            scheme: scheme.into(),
        }
    }

    /// Drain the queue until all producers are gone.
    pub async fn run(self, mut receiver: mpsc::UnboundedReceiver<FederationEvent>) {
        tracing::info!("Federation sender started");
        while let Some(event) = receiver.recv().await {
            self.dispatch(event).await;
        }
        tracing::info!("Federation queue closed; sender stopping");
    }

    /// Resolve an event's targets and deliver to each.
    async fn dispatch(&self, event: FederationEvent) {
        let (targets, request) = match event {
            FederationEvent::AddVideo { to_host, payload } => {
                let targets = match to_host {
                    Some(host) => vec![host],
                    None => self.broadcast_targets().await,
                };
                (targets, RemoteVideoRequest::Add(payload))
            }
            FederationEvent::UpdateVideo(payload) => (
                self.broadcast_targets().await,
                RemoteVideoRequest::Update(payload),
            ),
            FederationEvent::RemoveVideo(payload) => (
                self.broadcast_targets().await,
                RemoteVideoRequest::Remove(payload),
            ),
        };

        for host in targets {
            self.deliver(&host, &request).await;
        }
    }

    /// All known pod hosts. A directory read failure degrades to an
    /// empty broadcast, logged.
    async fn broadcast_targets(&self) -> Vec<String> {
        match PodRepo::list_hosts(&self.pool).await {
            Ok(hosts) => hosts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list peer pods; skipping broadcast");
                Vec::new()
            }
        }
    }

    /// Deliver one request to one peer with retry. Exhausted retries
    /// are logged and dropped.
    async fn deliver(&self, host: &str, request: &RemoteVideoRequest) {
        let url = self.endpoint_url(host);

        for delay_secs in RETRY_DELAYS_SECS {
            match self.try_send(&url, request).await {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(url, error = %e, "Federation delivery attempt failed, retrying");
                    tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        if let Err(e) = self.try_send(&url, request).await {
            tracing::error!(url, error = %e, "Federation delivery failed after all retries");
        }
    }

    /// Execute a single POST and check the response status.
    async fn try_send(&self, url: &str, request: &RemoteVideoRequest) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }

    fn endpoint_url(&self, host: &str) -> String {
        format!("{}://{host}{REMOTE_VIDEOS_PATH}", self.scheme)
    }
}
