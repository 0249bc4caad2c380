//! HTTP API の DTO 定義

use serde::{Deserialize, Serialize};

/// ルーム作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateRoomPayload {
    pub name: String,
}

/// ルーム一覧のサマリ
#[derive(Debug, Serialize)]
pub struct RoomSummaryDto {
    pub name: String,
    /// RFC 3339 形式の作成時刻
    pub created_at: String,
}

/// ルーム詳細（メッセージ履歴を含む）
#[derive(Debug, Serialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub created_at: String,
    pub messages: Vec<MessageDto>,
}

/// 永続化済みメッセージ
#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub author: String,
    pub body: String,
    pub created_at: String,
}
