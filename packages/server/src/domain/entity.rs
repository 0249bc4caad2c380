//! ドメインエンティティ定義

use super::value_object::{Author, MessageBody, MessageId, RoomId, RoomName, Timestamp};

/// チャットルーム
///
/// ルームのメンバーシップ（どの接続がこのルームに居るか）はエンティティ
/// ではなく Connection Registry が管理します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, name: RoomName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }
}

/// 永続化済みのチャットメッセージ
///
/// 作成後は不変。編集・削除はこのコアのスコープ外です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub author: Author,
    pub body: MessageBody,
    pub created_at: Timestamp,
}

impl StoredMessage {
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        author: Author,
        body: MessageBody,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            author,
            body,
            created_at,
        }
    }
}
