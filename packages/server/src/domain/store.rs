//! Storage collaborator の trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::{Room, StoredMessage};
use super::error::StorageError;
use super::value_object::{Author, MessageBody, RoomId, RoomName, Timestamp};

/// Message Store trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
/// 依存しません。実装は複数の Message Pipeline から並行に呼び出されるため、
/// 内部で自身の同期を行う必要があります。
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// ルームを作成する。同名のルームが存在する場合は
    /// `StorageError::DuplicateRoom` を返す
    async fn create_room(
        &self,
        name: RoomName,
        created_at: Timestamp,
    ) -> Result<Room, StorageError>;

    /// ルームを名前で取得する。存在しない場合は
    /// `StorageError::RoomNotFound` を返す
    async fn get_room(&self, name: &RoomName) -> Result<Room, StorageError>;

    /// 全てのルームを作成順で取得する
    async fn list_rooms(&self) -> Result<Vec<Room>, StorageError>;

    /// メッセージを永続化する。ルームが存在しない場合は
    /// `StorageError::RoomNotFound` を返す
    async fn create_message(
        &self,
        room_id: RoomId,
        author: Author,
        body: MessageBody,
        created_at: Timestamp,
    ) -> Result<StoredMessage, StorageError>;

    /// ルームのメッセージを作成順で取得する
    async fn list_messages(&self, room_id: RoomId) -> Result<Vec<StoredMessage>, StorageError>;
}
