// The core module contains all business logic.
// Each feature gets its own submodule. Nothing in here knows about HTTP.

#[path = "events/mod.rs"]
pub mod events;

#[path = "moderation/mod.rs"]
pub mod moderation;
