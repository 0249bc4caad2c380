//! Room-scoped WebSocket chat relay server.
//!
//! Clients create rooms over the HTTP API, join them over WebSocket, and
//! receive the room's re-rendered message list on every post.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use irori_server::{
    hub::{self, Hub},
    infrastructure::{render::HtmlMessageListRenderer, storage::InMemoryMessageStore},
    ui::Server,
    usecase::{
        CreateRoomUseCase, GetRoomHistoryUseCase, JoinRoomUseCase, ListRoomsUseCase,
        PostMessageUseCase,
    },
};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "Room-scoped WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Storage / Renderer collaborators
    // 2. Hub event loop
    // 3. UseCases
    // 4. Server

    // 1. Collaborators
    let store = Arc::new(InMemoryMessageStore::new());
    let renderer = Arc::new(HtmlMessageListRenderer::new());

    // 2. Hub event loop (the single owner of the connection registry)
    let (hub_handle, hub_rx) = Hub::channel();
    let hub_task = tokio::spawn(hub::run_hub(hub_rx, hub_handle.clone()));

    // 3. UseCases
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(store.clone()));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(store.clone()));
    let room_history_usecase = Arc::new(GetRoomHistoryUseCase::new(store.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(store.clone(), renderer.clone()));
    let post_message_usecase = Arc::new(PostMessageUseCase::new(
        store.clone(),
        renderer.clone(),
        hub_handle.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        create_room_usecase,
        list_rooms_usecase,
        room_history_usecase,
        join_room_usecase,
        post_message_usecase,
        hub_handle.clone(),
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // Stop the hub after the HTTP surface has drained: remaining
    // connections are closed and in-flight deliveries get a bounded window.
    hub_handle.shutdown();
    if let Err(e) = hub_task.await {
        tracing::error!("Hub task failed: {}", e);
    }
}
