//! Renderer collaborator の trait 定義

use super::entity::StoredMessage;
use super::error::RenderError;

/// ルームのメッセージ一覧を配信用ペイロードへ変換するインターフェース
///
/// Hub / Dispatcher はレンダリング結果を不透明なペイロードとして扱うため、
/// 出力形式（HTML フラグメント等）はこの trait の実装側の関心事です。
/// レンダリングは純粋な変換であり、副作用を持ちません。
pub trait MessageRenderer: Send + Sync {
    /// ルームの現在のメッセージ一覧をペイロードに変換する
    fn render(&self, messages: &[StoredMessage]) -> Result<String, RenderError>;
}
