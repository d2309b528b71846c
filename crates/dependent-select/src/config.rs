//! Configuration
//!
//! Page-level settings for the selector. Every field has a default so a page
//! only needs to supply what differs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::source::StaffEndpoint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid selector config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Labels of the single placeholder option shown instead of staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelLabels {
    pub no_selection: String,
    pub no_staff: String,
    pub load_error: String,
}

impl Default for SentinelLabels {
    fn default() -> Self {
        Self {
            no_selection: "no selection".to_string(),
            no_staff: "no staff available".to_string(),
            load_error: "error loading data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Element id of the course select
    pub parent_id: String,
    /// Element id of the staff select
    pub dependent_id: String,
    pub endpoint: StaffEndpoint,
    pub labels: SentinelLabels,
    /// Give up on a staff request after this long; `None` waits indefinitely
    pub request_timeout_ms: Option<u32>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            parent_id: "id_course".to_string(),
            dependent_id: "id_staff".to_string(),
            endpoint: StaffEndpoint::default(),
            labels: SentinelLabels::default(),
            request_timeout_ms: None,
        }
    }
}

impl SelectorConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses page-supplied settings; invalid JSON is logged and ignored
    pub fn from_json_or_default(raw: &str) -> Self {
        Self::from_json(raw).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring page config");
            Self::default()
        })
    }
}
