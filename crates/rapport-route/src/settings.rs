//! On-disk settings for the whole pipeline

use crate::config::RouterConfig;
use rapport_core::ContextConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub context: ContextConfig,
    pub router: RouterConfig,
}

impl Settings {
    /// Read settings from `path`; missing or malformed files give defaults
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed settings, using defaults");
                Self::default()
            }
        }
    }
}
