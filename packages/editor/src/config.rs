use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "lingua.config.json";

/// Authoring editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Reject blocks whose content does not match their type
    #[serde(default = "default_validate_blocks")]
    pub validate_blocks: bool,

    /// Longest accepted node title, in characters; unlimited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_title_length: Option<usize>,

    /// Prefix for generated node ids
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_validate_blocks() -> bool {
    true
}

fn default_id_prefix() -> String {
    "node".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            tracing::debug!("Loaded editor config from {}", config_path.display());
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            validate_blocks: default_validate_blocks(),
            max_title_length: None,
            id_prefix: default_id_prefix(),
        }
    }
}
