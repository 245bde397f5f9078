// Filter rules live in a YAML file, one entry per filter:
//
//   - triggers: ["badword", "otherword"]
//     action: chat.postEphemeral
//     message: "Please keep it civil."

use std::path::Path;

use super::app_config::ConfigError;
use crate::core::moderation::{Filter, FilterSet};

/// Read and validate the filter file at `path`.
pub fn load_filters(path: &Path) -> Result<FilterSet, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_filters(&raw)
}

pub fn parse_filters(raw: &str) -> Result<FilterSet, ConfigError> {
    // An empty file means "no filters", which serde_yaml would reject.
    if raw.trim().is_empty() {
        return Ok(FilterSet::default());
    }

    let filters: Vec<Filter> = serde_yaml::from_str(raw)?;
    for (index, filter) in filters.iter().enumerate() {
        validate(filter).map_err(|reason| ConfigError::InvalidFilter { index, reason })?;
    }

    Ok(FilterSet::new(filters))
}

fn validate(filter: &Filter) -> Result<(), String> {
    if filter.triggers.is_empty() {
        return Err("at least one trigger word is required".to_string());
    }
    // An empty trigger is a substring of every message.
    if filter.triggers.iter().any(|t| t.is_empty()) {
        return Err("trigger words must not be empty".to_string());
    }
    if filter.action.method_name().is_empty() {
        return Err("action must name a Slack API method".to_string());
    }
    if filter.message.is_empty() {
        return Err("message must not be empty".to_string());
    }
    Ok(())
}
