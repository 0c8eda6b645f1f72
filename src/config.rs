use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::errors::{BotError, BotResult};

const DEFAULT_MEDIA_DIR: &str = "media";

/// Startup configuration read from the environment
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub media_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BotResult<Self> {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| BotError::Configuration("TELEGRAM_BOT_TOKEN must be set".to_string()))?;

        let media_dir = lookup("MEDIA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR));

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bot_token,
            media_dir,
            catalog_path,
        })
    }
}

// Keep the token out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("media_dir", &self.media_dir)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}
