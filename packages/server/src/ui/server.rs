//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::hub::Hub;
use crate::usecase::{
    CreateRoomUseCase, GetRoomHistoryUseCase, JoinRoomUseCase, ListRoomsUseCase,
    PostMessageUseCase,
};

use super::{
    handler::{
        http::{create_room, get_room_detail, get_rooms, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat relay server
///
/// This struct encapsulates the server configuration and provides methods
/// to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     create_room_usecase,
///     list_rooms_usecase,
///     room_history_usecase,
///     join_room_usecase,
///     post_message_usecase,
///     hub,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    create_room_usecase: Arc<CreateRoomUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// GetRoomHistoryUseCase（ルーム詳細取得のユースケース）
    room_history_usecase: Arc<GetRoomHistoryUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    post_message_usecase: Arc<PostMessageUseCase>,
    /// Hub handle shared with the websocket handlers
    hub: Hub,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        create_room_usecase: Arc<CreateRoomUseCase>,
        list_rooms_usecase: Arc<ListRoomsUseCase>,
        room_history_usecase: Arc<GetRoomHistoryUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        post_message_usecase: Arc<PostMessageUseCase>,
        hub: Hub,
    ) -> Self {
        Self {
            create_room_usecase,
            list_rooms_usecase,
            room_history_usecase,
            join_room_usecase,
            post_message_usecase,
            hub,
        }
    }

    /// Run the WebSocket chat relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            create_room_usecase: self.create_room_usecase,
            list_rooms_usecase: self.list_rooms_usecase,
            room_history_usecase: self.room_history_usecase,
            join_room_usecase: self.join_room_usecase,
            post_message_usecase: self.post_message_usecase,
            hub: self.hub,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws/{room}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route("/api/rooms/{room_name}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket chat relay listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/{{room}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
