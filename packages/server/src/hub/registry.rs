//! Authoritative map of live connections.
//!
//! Deliberately not synchronized: the hub task is the only reader and
//! writer (single-writer discipline), so no lock is needed here. Nothing
//! outside the `hub` module touches this type.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::RoomName;

use super::connection::{ConnId, ConnectionHandle};

/// The live set: `ConnId` → connection handle, plus the room subscription
/// carried by each handle.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnId, Arc<ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a connection into the live set.
    pub fn add(&mut self, conn: Arc<ConnectionHandle>) {
        let id = conn.id();
        if self.connections.insert(id, conn).is_some() {
            // Ids are random uuids, so hitting this means a double register.
            tracing::error!(conn = %id, "connection registered twice");
        } else {
            tracing::debug!(conn = %id, total = self.connections.len(), "connection registered");
        }
    }

    /// Remove a connection. Removing an absent id is a no-op, so repeated
    /// unregister events (read-loop teardown plus a failed delivery
    /// reporting the same connection) stay harmless.
    pub fn remove(&mut self, id: ConnId) {
        if self.connections.remove(&id).is_some() {
            tracing::debug!(conn = %id, total = self.connections.len(), "connection removed");
        }
    }

    /// Connections whose subscription equals `room`, as of this call. The
    /// caller collects the iterator into an owned snapshot before handing
    /// it to concurrent delivery tasks.
    pub fn members<'a>(
        &'a self,
        room: &'a RoomName,
    ) -> impl Iterator<Item = &'a Arc<ConnectionHandle>> {
        self.connections
            .values()
            .filter(move |conn| conn.room() == room)
    }

    /// Set the closing flag on a connection without removing its entry.
    pub fn mark_closing(&self, id: ConnId) {
        if let Some(conn) = self.connections.get(&id) {
            conn.mark_closing();
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Take every remaining handle (shutdown path).
    pub fn drain(&mut self) -> Vec<Arc<ConnectionHandle>> {
        self.connections.drain().map(|(_, conn)| conn).collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::hub::connection::{ConnectionSink, SinkError};

    use super::*;

    /// 何もしないテスト用 Sink
    struct NullSink;

    #[async_trait]
    impl ConnectionSink for NullSink {
        async fn send_text(&mut self, _payload: &str) -> Result<(), SinkError> {
            Ok(())
        }

        async fn send_ping(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
    }

    fn connection(room: &str) -> Arc<ConnectionHandle> {
        Arc::new(ConnectionHandle::new(
            ConnId::generate(),
            RoomName::new(room.to_string()).unwrap(),
            Box::new(NullSink),
        ))
    }

    #[test]
    fn test_add_and_remove_track_live_set() {
        // テスト項目: 登録・削除の後のライブセットが「登録 − 削除」に一致する
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let alice = connection("general");
        let bob = connection("general");

        // when (操作):
        registry.add(alice.clone());
        registry.add(bob.clone());
        registry.remove(alice.id());

        // then (期待する結果):
        assert_eq!(registry.len(), 1);
        let remaining: Vec<ConnId> = registry
            .members(&RoomName::new("general".to_string()).unwrap())
            .map(|c| c.id())
            .collect();
        assert_eq!(remaining, vec![bob.id()]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        // テスト項目: 既に削除済みの接続を再度削除してもエラーにならない（冪等性）
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let conn = connection("general");
        registry.add(conn.clone());

        // when (操作):
        registry.remove(conn.id());
        registry.remove(conn.id());
        registry.remove(ConnId::generate());

        // then (期待する結果):
        assert!(registry.is_empty());
    }

    #[test]
    fn test_members_filters_by_room() {
        // テスト項目: members がルームの購読者のみを返す
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let general_a = connection("general");
        let general_b = connection("general");
        let random = connection("random");
        registry.add(general_a.clone());
        registry.add(general_b.clone());
        registry.add(random.clone());

        // when (操作):
        let general = RoomName::new("general".to_string()).unwrap();
        let mut member_ids: Vec<ConnId> = registry.members(&general).map(|c| c.id()).collect();

        // then (期待する結果):
        member_ids.sort_by_key(|id| format!("{id}"));
        let mut expected = vec![general_a.id(), general_b.id()];
        expected.sort_by_key(|id| format!("{id}"));
        assert_eq!(member_ids, expected);
    }

    #[test]
    fn test_members_of_unknown_room_is_empty() {
        // テスト項目: 購読者のいないルームの members は空
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.add(connection("general"));

        // when (操作):
        let lounge = RoomName::new("lounge".to_string()).unwrap();
        let count = registry.members(&lounge).count();

        // then (期待する結果):
        assert_eq!(count, 0);
    }

    #[test]
    fn test_mark_closing_sets_flag_without_removing() {
        // テスト項目: mark_closing はエントリを残したままフラグだけを立てる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let conn = connection("general");
        registry.add(conn.clone());

        // when (操作):
        registry.mark_closing(conn.id());

        // then (期待する結果):
        assert!(conn.is_closing());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_drain_takes_all_handles() {
        // テスト項目: drain が全てのハンドルを取り出し、レジストリを空にする
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.add(connection("general"));
        registry.add(connection("random"));

        // when (操作):
        let drained = registry.drain();

        // then (期待する結果):
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());
    }
}
