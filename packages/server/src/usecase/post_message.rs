//! UseCase: メッセージ投稿処理（Message Pipeline）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - パイプラインの順序（永続化 → レンダリング → broadcast イベント投入）
//!
//! ### なぜこのテストが必要か
//! - 「ブロードキャストの前に書き込まれている」ことを保証する
//! - 存在しないルームへの投稿が拒否されることを保証する
//! - 永続化失敗時に broadcast イベントが発行されないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿の永続化とルームスコープのブロードキャスト
//! - 異常系：ルーム不在、Storage 障害
//! - エッジケース：レンダラ出力がそのままペイロードになる

use std::sync::Arc;

use irori_shared::time::now_utc_millis;

use crate::domain::{Author, MessageBody, MessageRenderer, MessageStore, RoomName, Timestamp};
use crate::hub::Hub;

use super::error::PostMessageError;

/// メッセージ投稿のユースケース
///
/// 受信フレーム 1 件を broadcast イベント 1 件に変換します。ペイロードの
/// 構築（永続化・レンダリング）はイベント投入の前に完了するため、Hub の
/// イベントループが I/O を待つことはありません。
pub struct PostMessageUseCase {
    /// Storage collaborator（データアクセスの抽象化）
    store: Arc<dyn MessageStore>,
    /// Renderer collaborator（配信ペイロード生成の抽象化）
    renderer: Arc<dyn MessageRenderer>,
    /// Hub へのイベント投入ハンドル
    hub: Hub,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>, renderer: Arc<dyn MessageRenderer>, hub: Hub) -> Self {
        Self {
            store,
            renderer,
            hub,
        }
    }

    /// メッセージ投稿を実行
    ///
    /// 1. ルームの存在確認（明示的作成ポリシー：未作成のルームは拒否）
    /// 2. メッセージを永続化（ブロードキャストより先）
    /// 3. ルームの最新メッセージ一覧をレンダリング
    /// 4. Hub に broadcast イベントを投入（fire-and-forget）
    ///
    /// # Arguments
    ///
    /// * `author` - 投稿者名（Domain Model）
    /// * `room_name` - 投稿先ルーム名（Domain Model）
    /// * `body` - メッセージ本文（Domain Model）
    pub async fn execute(
        &self,
        author: Author,
        room_name: RoomName,
        body: MessageBody,
    ) -> Result<(), PostMessageError> {
        let timestamp = Timestamp::new(now_utc_millis());

        // 1. ルームの存在確認
        let room = self.store.get_room(&room_name).await?;

        // 2. 永続化。ここで失敗した場合はこのフレームだけを破棄する
        self.store
            .create_message(room.id, author, body, timestamp)
            .await?;

        // 3. ルームの最新メッセージ一覧をペイロードへ変換
        let messages = self.store.list_messages(room.id).await?;
        let payload = self.renderer.render(&messages)?;

        // 4. Hub に broadcast イベントを投入
        self.hub.broadcast(room_name, payload);

        Ok(())
    }
}
