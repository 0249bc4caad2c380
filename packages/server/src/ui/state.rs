//! Server state shared across handlers.

use std::sync::Arc;

use crate::hub::Hub;
use crate::usecase::{
    CreateRoomUseCase, GetRoomHistoryUseCase, JoinRoomUseCase, ListRoomsUseCase,
    PostMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// GetRoomHistoryUseCase（ルーム詳細取得のユースケース）
    pub room_history_usecase: Arc<GetRoomHistoryUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// Handle for registering connections and submitting hub events
    pub hub: Hub,
}
