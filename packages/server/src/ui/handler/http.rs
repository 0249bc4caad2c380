//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use irori_shared::time::millis_to_rfc3339;

use crate::{
    domain::{Room, RoomName, StoredMessage},
    infrastructure::dto::http::{CreateRoomPayload, MessageDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::{CreateRoomError, GetRoomHistoryError},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state.list_rooms_usecase.execute().await.map_err(|e| {
        tracing::error!("Failed to list rooms: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Domain Model から DTO への変換
    let summaries = rooms.into_iter().map(room_summary_dto).collect();
    Ok(Json(summaries))
}

/// Create a new room. Rooms only come into being through this endpoint;
/// duplicates are rejected.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<(StatusCode, Json<RoomSummaryDto>), StatusCode> {
    let name = match RoomName::try_from(payload.name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Invalid room name: {}", e);
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    match state.create_room_usecase.execute(name).await {
        Ok(room) => Ok((StatusCode::CREATED, Json(room_summary_dto(room)))),
        Err(CreateRoomError::DuplicateRoom(name)) => {
            tracing::warn!("Room '{}' already exists", name);
            Err(StatusCode::CONFLICT)
        }
        Err(CreateRoomError::Storage(e)) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get room detail (metadata plus full message history) by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    // A name that fails validation cannot name an existing room.
    let name = RoomName::try_from(room_name).map_err(|_| StatusCode::NOT_FOUND)?;

    match state.room_history_usecase.execute(&name).await {
        Ok((room, messages)) => Ok(Json(room_detail_dto(room, messages))),
        Err(GetRoomHistoryError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomHistoryError::Storage(e)) => {
            tracing::error!("Failed to get room detail: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Domain Model から DTO への変換

fn room_summary_dto(room: Room) -> RoomSummaryDto {
    RoomSummaryDto {
        name: room.name.into_string(),
        created_at: millis_to_rfc3339(room.created_at.value()),
    }
}

fn room_detail_dto(room: Room, messages: Vec<StoredMessage>) -> RoomDetailDto {
    RoomDetailDto {
        name: room.name.into_string(),
        created_at: millis_to_rfc3339(room.created_at.value()),
        messages: messages
            .into_iter()
            .map(|message| MessageDto {
                author: message.author.into_string(),
                body: message.body.into_string(),
                created_at: millis_to_rfc3339(message.created_at.value()),
            })
            .collect(),
    }
}
