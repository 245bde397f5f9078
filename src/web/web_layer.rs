// Web layer - the HTTP adapter in front of the core.
// Verifies, classifies, acknowledges, then hands work to the core services.

#[path = "server.rs"]
pub mod server;

#[path = "events_handler.rs"]
pub mod events_handler;

pub use server::{router, AppState};
