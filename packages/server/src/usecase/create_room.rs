//! UseCase: ルーム作成処理
//!
//! ルームはこのユースケースを通じてのみ作成されます（明示的作成ポリシー）。
//! WebSocket の参加やメッセージ投稿がルームを暗黙に作ることはありません。

use std::sync::Arc;

use irori_shared::time::now_utc_millis;

use crate::domain::{MessageStore, Room, RoomName, Timestamp};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Storage collaborator（データアクセスの抽象化）
    store: Arc<dyn MessageStore>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// ルーム作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成されたルーム（Domain Model）
    /// * `Err(CreateRoomError::DuplicateRoom)` - 同名のルームが既に存在する
    pub async fn execute(&self, name: RoomName) -> Result<Room, CreateRoomError> {
        let created_at = Timestamp::new(now_utc_millis());
        let room = self.store.create_room(name, created_at).await?;
        tracing::info!(room = %room.name, "room created");
        Ok(room)
    }
}
