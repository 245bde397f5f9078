// Core events module - turns raw Events API deliveries into typed events.

pub mod event_classifier;
pub mod event_models;

pub use event_classifier::*;
pub use event_models::*;
