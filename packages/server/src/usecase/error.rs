//! UseCase 層のエラー定義
//!
//! Storage のエラーのうち、呼び出し側が分岐する必要のあるもの
//! （ルーム不在・重複）だけを専用のバリアントに持ち上げます。

use thiserror::Error;

use crate::domain::{RenderError, StorageError};

/// ルーム作成のエラー
#[derive(Debug, Error)]
pub enum CreateRoomError {
    #[error("room '{0}' already exists")]
    DuplicateRoom(String),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for CreateRoomError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DuplicateRoom(name) => Self::DuplicateRoom(name),
            other => Self::Storage(other),
        }
    }
}

/// ルーム参加のエラー
#[derive(Debug, Error)]
pub enum JoinRoomError {
    #[error("room not found")]
    RoomNotFound,
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<StorageError> for JoinRoomError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::RoomNotFound => Self::RoomNotFound,
            other => Self::Storage(other),
        }
    }
}

/// メッセージ投稿（パイプライン）のエラー
///
/// どのバリアントも 1 フレーム分の失敗であり、接続や Hub の状態には
/// 影響しません。
#[derive(Debug, Error)]
pub enum PostMessageError {
    #[error("room not found")]
    RoomNotFound,
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<StorageError> for PostMessageError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::RoomNotFound => Self::RoomNotFound,
            other => Self::Storage(other),
        }
    }
}

/// ルーム詳細（履歴）取得のエラー
#[derive(Debug, Error)]
pub enum GetRoomHistoryError {
    #[error("room not found")]
    RoomNotFound,
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for GetRoomHistoryError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::RoomNotFound => Self::RoomNotFound,
            other => Self::Storage(other),
        }
    }
}
