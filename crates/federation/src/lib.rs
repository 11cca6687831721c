//! Federation synchronization.
//!
//! Owned-video lifecycle events are packaged into minimal wire payloads
//! and emitted onto an outbound queue; a sender task drains the queue
//! and delivers to peer pods. The core's contract ends at "message
//! enqueued" -- delivery failures are logged, never propagated.

pub mod payload;
pub mod queue;
pub mod sender;

pub use payload::{AddVideoPayload, RemoteVideoRequest, RemoveVideoPayload, UpdateVideoPayload};
pub use queue::{FederationEvent, FederationQueue};
pub use sender::FederationSender;
