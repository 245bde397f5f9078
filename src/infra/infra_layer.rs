// The infra module contains implementations of core traits.
// Each concern gets its own submodule.

#[path = "slack/mod.rs"]
pub mod slack;

#[path = "config/mod.rs"]
pub mod config;
