//! Broadcast fan-out.
//!
//! One task per recipient, so one slow or dead peer cannot delay delivery
//! to the others. Each task serializes on its connection's write guard; a
//! failed write marks the connection closing and reports it back to the
//! hub as a fresh unregister event. There are no retries: a write failure
//! is a dead connection, not a transient error.

use std::sync::Arc;

use tokio::task::JoinSet;

use super::Hub;
use super::connection::{ConnectionHandle, DeliveryOutcome};

/// Spawn one delivery task per member of the snapshot.
///
/// Fire-and-forget from the event loop's perspective: the tasks land in
/// `tasks` so shutdown can drain them, and failures surface only as
/// unregister events.
pub(super) fn deliver(
    tasks: &mut JoinSet<()>,
    members: Vec<Arc<ConnectionHandle>>,
    payload: Arc<str>,
    hub: Hub,
) {
    for conn in members {
        let payload = Arc::clone(&payload);
        let hub = hub.clone();
        tasks.spawn(async move {
            if conn.deliver(&payload).await == DeliveryOutcome::Failed {
                hub.unregister(conn.id());
            }
        });
    }
}
