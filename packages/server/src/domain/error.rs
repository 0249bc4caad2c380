//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の検証エラー
///
/// コンストラクタでの入力値検証に失敗した場合に返されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
    #[error("{0} contains control characters")]
    ControlCharacter(&'static str),
}

/// Storage collaborator のエラー
///
/// Infrastructure 層の実装（インメモリ、将来的には DBMS）が返すエラーを
/// ドメイン層の語彙で表現します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// 同名のルームが既に存在する（明示的作成ポリシーでは重複はエラー）
    #[error("room '{0}' already exists")]
    DuplicateRoom(String),
    /// 指定されたルームが存在しない
    #[error("room not found")]
    RoomNotFound,
    /// ストレージバックエンドの内部エラー
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Renderer collaborator のエラー
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render message list: {0}")]
    Format(#[from] std::fmt::Error),
}
