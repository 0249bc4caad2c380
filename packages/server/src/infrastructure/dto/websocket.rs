//! WebSocket メッセージの DTO 定義
//!
//! クライアントから受信する JSON エンベロープ。テキストフレーム 1 つに
//! つき 1 オブジェクトです。サーバーからの送信はレンダリング済みの HTML
//! フラグメントそのものなので、送信用の DTO はありません。

use serde::Deserialize;

/// 受信フレーム: `{"room": "<room name>", "message": "<text>"}`
///
/// 値の検証（長さ・制御文字）は Domain Model への変換時に行います。
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub room: String,
    pub message: String,
}
