use crate::config::default_base_url;

use serde::{Deserialize, Serialize};

/// Where tray and notification images are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Base URL that relative image ids such as `/tray.png` are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}
