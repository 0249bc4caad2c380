//! UseCase: ルーム詳細（履歴）取得処理
//!
//! HTTP API のルーム詳細エンドポイント用。WebSocket の参加パスでは
//! レンダリング済みペイロードを返す `JoinRoomUseCase` を使います。

use std::sync::Arc;

use crate::domain::{MessageStore, Room, RoomName, StoredMessage};

use super::error::GetRoomHistoryError;

/// ルーム詳細取得のユースケース
pub struct GetRoomHistoryUseCase {
    /// Storage collaborator（データアクセスの抽象化）
    store: Arc<dyn MessageStore>,
}

impl GetRoomHistoryUseCase {
    /// 新しい GetRoomHistoryUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// ルームと、そのメッセージ履歴を作成順で取得
    pub async fn execute(
        &self,
        room_name: &RoomName,
    ) -> Result<(Room, Vec<StoredMessage>), GetRoomHistoryError> {
        let room = self.store.get_room(room_name).await?;
        let messages = self.store.list_messages(room.id).await?;
        Ok((room, messages))
    }
}
