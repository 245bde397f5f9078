// Core moderation module - filter matching and action dispatch.
// Following the same pattern as the events module.

pub mod moderation_models;
pub mod moderation_service;

pub use moderation_models::*;
pub use moderation_service::*;
