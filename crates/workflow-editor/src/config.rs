//! Editor configuration
//!
//! Construction-time settings for one editor instance. Every field has a
//! default, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::history::DEFAULT_MAX_SNAPSHOTS;
use crate::locale::{LocaleBundle, FALLBACK_LANG};

/// Settings for an [`EditorStore`](crate::EditorStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Active language tag (e.g. "en-US", "zh-CN")
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Maximum number of snapshots on each history stack
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Log every dispatched action at info level instead of debug
    #[serde(default)]
    pub debug: bool,
    /// Extra messages merged over the built-in locales
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales: Option<LocaleBundle>,
}

fn default_lang() -> String {
    FALLBACK_LANG.to_string()
}

fn default_max_history() -> usize {
    DEFAULT_MAX_SNAPSHOTS
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            max_history: default_max_history(),
            debug: false,
            locales: None,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded editor config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Set the active language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the history bound
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }
}
