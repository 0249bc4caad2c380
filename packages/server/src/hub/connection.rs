//! Per-connection handle shared between the registry, the lifecycle
//! adapter, and in-flight delivery tasks.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::RoomName;

/// Write/close half of one client transport.
///
/// The production implementation wraps an axum WebSocket sink; tests
/// substitute scripted sinks. Reading stays with the lifecycle adapter and
/// is not part of this trait.
#[async_trait]
pub trait ConnectionSink: Send {
    async fn send_text(&mut self, payload: &str) -> Result<(), SinkError>;
    async fn send_ping(&mut self) -> Result<(), SinkError>;
    async fn close(&mut self) -> Result<(), SinkError>;
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("connection already closed")]
    Closed,
}

/// Unique identity of one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(Uuid);

impl ConnId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Payload fully written.
    Delivered,
    /// Connection was already closing; nothing was written.
    SkippedClosing,
    /// Write failed. The connection was marked closing and the transport
    /// closed; the caller must emit an unregister event.
    Failed,
}

/// One live connection: identity, room subscription, closing flag, and the
/// write-serialization guard over the transport's write half.
pub struct ConnectionHandle {
    id: ConnId,
    room: RoomName,
    closing: AtomicBool,
    /// The write guard: exactly one task writes to the sink at a time, so
    /// two concurrent broadcasts can never interleave on the same
    /// connection.
    sink: Mutex<Box<dyn ConnectionSink>>,
}

impl ConnectionHandle {
    pub fn new(id: ConnId, room: RoomName, sink: Box<dyn ConnectionSink>) -> Self {
        Self {
            id,
            room,
            closing: AtomicBool::new(false),
            sink: Mutex::new(sink),
        }
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    /// The room this connection subscribed to at upgrade time. Fixed for
    /// the whole connection lifetime.
    pub fn room(&self) -> &RoomName {
        &self.room
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    /// No further writes will be attempted once this is set.
    pub fn mark_closing(&self) {
        self.closing.store(true, Ordering::Release);
    }

    /// Deliver one payload under the write guard.
    ///
    /// The guard is held across the whole write, so a slow peer only ever
    /// delays writes to itself. On failure the transport is closed
    /// best-effort and the handle marked closing; there are no retries.
    pub async fn deliver(&self, payload: &str) -> DeliveryOutcome {
        let mut sink = self.sink.lock().await;
        if self.is_closing() {
            return DeliveryOutcome::SkippedClosing;
        }
        match sink.send_text(payload).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => {
                tracing::warn!(conn = %self.id, error = %e, "write failed, dropping connection");
                self.mark_closing();
                let _ = sink.close().await;
                DeliveryOutcome::Failed
            }
        }
    }

    /// Keepalive probe, routed through the same guard as payload writes.
    pub async fn ping(&self) -> DeliveryOutcome {
        let mut sink = self.sink.lock().await;
        if self.is_closing() {
            return DeliveryOutcome::SkippedClosing;
        }
        match sink.send_ping().await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => {
                tracing::debug!(conn = %self.id, error = %e, "keepalive ping failed");
                self.mark_closing();
                let _ = sink.close().await;
                DeliveryOutcome::Failed
            }
        }
    }

    /// Mark closing and close the transport. Safe to call more than once;
    /// every read-loop exit path ends here.
    pub async fn close(&self) {
        self.mark_closing();
        let mut sink = self.sink.lock().await;
        let _ = sink.close().await;
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("room", &self.room)
            .field("closing", &self.is_closing())
            .finish_non_exhaustive()
    }
}
