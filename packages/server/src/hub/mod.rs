//! Connection hub: the single owner of live-connection state.
//!
//! All registry mutations (register, unregister, broadcast fan-out) are
//! serialized through one event channel drained by [`run_hub`], so the
//! registry itself needs no locking. Broadcast payloads are fully built
//! before the event is enqueued; the hub task never blocks on application
//! I/O.

mod connection;
mod dispatcher;
mod registry;

pub use connection::{ConnId, ConnectionHandle, ConnectionSink, DeliveryOutcome, SinkError};
pub use registry::ConnectionRegistry;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::domain::RoomName;

/// How long the shutdown path waits for in-flight deliveries.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Events accepted by the hub task, processed strictly in arrival order.
#[derive(Debug)]
pub enum HubEvent {
    /// A connection finished its transport upgrade and joins the live set.
    Register(Arc<ConnectionHandle>),
    /// A connection left: its read loop ended, or a delivery to it failed.
    Unregister(ConnId),
    /// Deliver a rendered payload to every member of `room`.
    Broadcast { room: RoomName, payload: Arc<str> },
    /// Stop the loop: close remaining connections, drain deliveries.
    Shutdown,
}

/// Cheaply cloneable handle for submitting events to the hub task.
#[derive(Debug, Clone)]
pub struct Hub {
    tx: mpsc::UnboundedSender<HubEvent>,
}

impl Hub {
    /// Create a hub handle and the receiver to pass to [`run_hub`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HubEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn register(&self, conn: Arc<ConnectionHandle>) {
        self.send(HubEvent::Register(conn));
    }

    pub fn unregister(&self, id: ConnId) {
        self.send(HubEvent::Unregister(id));
    }

    pub fn broadcast(&self, room: RoomName, payload: impl Into<Arc<str>>) {
        self.send(HubEvent::Broadcast {
            room,
            payload: payload.into(),
        });
    }

    pub fn shutdown(&self) {
        self.send(HubEvent::Shutdown);
    }

    fn send(&self, event: HubEvent) {
        // The receiver only goes away after shutdown; late events are
        // dropped rather than treated as errors.
        if self.tx.send(event).is_err() {
            tracing::debug!("hub is no longer running, event dropped");
        }
    }
}

/// Run the hub event loop until a `Shutdown` event arrives (or every hub
/// handle is dropped).
///
/// Owns the [`ConnectionRegistry`]; nothing else reads or writes it. The
/// `hub` parameter is the handle delivery tasks use to report failed
/// connections back as `Unregister` events.
pub async fn run_hub(mut rx: mpsc::UnboundedReceiver<HubEvent>, hub: Hub) {
    let mut registry = ConnectionRegistry::new();
    let mut deliveries: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(HubEvent::Register(conn)) => registry.add(conn),
                Some(HubEvent::Unregister(id)) => registry.remove(id),
                Some(HubEvent::Broadcast { room, payload }) => {
                    let members: Vec<Arc<ConnectionHandle>> =
                        registry.members(&room).cloned().collect();
                    tracing::debug!(room = %room, members = members.len(), "broadcast");
                    dispatcher::deliver(&mut deliveries, members, payload, hub.clone());
                }
                Some(HubEvent::Shutdown) | None => break,
            },
            // Reap finished delivery tasks so the set does not grow without
            // bound between broadcasts.
            Some(_) = deliveries.join_next(), if !deliveries.is_empty() => {}
        }
    }

    // Close whatever is still connected, then give in-flight deliveries a
    // bounded window to finish.
    let remaining = registry.drain();
    tracing::info!(connections = remaining.len(), "hub shutting down");
    for conn in remaining {
        deliveries.spawn(async move { conn.close().await });
    }
    let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
        while deliveries.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!("timed out draining in-flight deliveries");
    }
}
