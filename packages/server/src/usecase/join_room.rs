//! UseCase: ルーム参加処理
//!
//! WebSocket 接続のアップグレード前に呼ばれ、ルームの存在確認と、新規
//! 接続へ最初に配信する「現在のメッセージ一覧」ペイロードの生成を行います。

use std::sync::Arc;

use crate::domain::{MessageRenderer, MessageStore, RoomName};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Storage collaborator（データアクセスの抽象化）
    store: Arc<dyn MessageStore>,
    /// Renderer collaborator（配信ペイロード生成の抽象化）
    renderer: Arc<dyn MessageRenderer>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>, renderer: Arc<dyn MessageRenderer>) -> Self {
        Self { store, renderer }
    }

    /// ルーム参加を実行
    ///
    /// ルームが存在しない場合は `JoinRoomError::RoomNotFound` を返します
    /// （明示的作成ポリシー：参加によるルームの自動作成は行いません）。
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 新規接続に配信する現在のメッセージ一覧ペイロード
    /// * `Err(JoinRoomError)` - 参加失敗
    pub async fn execute(&self, room_name: &RoomName) -> Result<String, JoinRoomError> {
        let room = self.store.get_room(room_name).await?;
        let messages = self.store.list_messages(room.id).await?;
        Ok(self.renderer.render(&messages)?)
    }
}
