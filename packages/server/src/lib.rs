//! Room-scoped WebSocket chat relay.
//!
//! Clients join named rooms over persistent connections, post text
//! messages, and receive the room's re-rendered message list pushed to
//! every member. All live-connection state is owned by the `hub` module's
//! single event loop.

// layers
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
