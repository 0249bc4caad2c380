//! インメモリ MessageStore 実装
//!
//! ドメイン層が定義する `MessageStore` trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ID はルーム・メッセージそれぞれ 1 始まりの連番で採番するため、
//! `list_messages` の結果（挿入順）は作成順と一致します。DBMS 実装に
//! 置き換える場合も同じ trait の背後に収まります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Author, MessageBody, MessageId, MessageStore, Room, RoomId, RoomName, StorageError,
    StoredMessage, Timestamp,
};

#[derive(Debug, Default)]
struct StoreInner {
    /// ルーム名 → Room（ルーム名が永続化キー）
    rooms: HashMap<String, Room>,
    /// 全ルームのメッセージ（挿入順 = 作成順）
    messages: Vec<StoredMessage>,
    next_room_id: u64,
    next_message_id: u64,
}

/// インメモリ MessageStore 実装
///
/// 内部状態を単一の Mutex で保護するため、複数の Message Pipeline からの
/// 並行呼び出しに対して安全です。
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_room(
        &self,
        name: RoomName,
        created_at: Timestamp,
    ) -> Result<Room, StorageError> {
        let mut inner = self.inner.lock().await;

        if inner.rooms.contains_key(name.as_str()) {
            return Err(StorageError::DuplicateRoom(name.as_str().to_string()));
        }

        inner.next_room_id += 1;
        let room = Room::new(RoomId::new(inner.next_room_id), name, created_at);
        inner
            .rooms
            .insert(room.name.as_str().to_string(), room.clone());
        Ok(room)
    }

    async fn get_room(&self, name: &RoomName) -> Result<Room, StorageError> {
        let inner = self.inner.lock().await;
        inner
            .rooms
            .get(name.as_str())
            .cloned()
            .ok_or(StorageError::RoomNotFound)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StorageError> {
        let inner = self.inner.lock().await;
        let mut rooms: Vec<Room> = inner.rooms.values().cloned().collect();
        // HashMap の列挙順は不定のため、採番順（作成順）に並べ直す
        rooms.sort_by_key(|room| room.id.value());
        Ok(rooms)
    }

    async fn create_message(
        &self,
        room_id: RoomId,
        author: Author,
        body: MessageBody,
        created_at: Timestamp,
    ) -> Result<StoredMessage, StorageError> {
        let mut inner = self.inner.lock().await;

        if !inner.rooms.values().any(|room| room.id == room_id) {
            return Err(StorageError::RoomNotFound);
        }

        inner.next_message_id += 1;
        let message = StoredMessage::new(
            MessageId::new(inner.next_message_id),
            room_id,
            author,
            body,
            created_at,
        );
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, room_id: RoomId) -> Result<Vec<StoredMessage>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .messages
            .iter()
            .filter(|message| message.room_id == room_id)
            .cloned()
            .collect())
    }
}
