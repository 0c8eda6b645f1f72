//! # Gateway Module
//!
//! Narrow interfaces between the storefront logic and the outside world:
//! a messaging [`Gateway`] for sending and editing messages, and a
//! [`MediaProvider`] that turns product image references into bytes.
//! The Telegram implementation lives in `bot::telegram`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardMarkup, MessageId};
use tracing::debug;

use crate::catalog::ImageRef;
use crate::errors::{BotError, BotResult, GatewayError};

/// A message previously sent through the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat: ChatId,
    pub id: MessageId,
}

/// Image bytes ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Outbound messaging primitives
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_text(
        &self,
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, GatewayError>;

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: Media,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MessageRef, GatewayError>;

    async fn edit_text(
        &self,
        message: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), GatewayError>;

    /// Replace the photo and caption of an existing message
    async fn edit_photo(
        &self,
        message: MessageRef,
        photo: Media,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), GatewayError>;

    /// Acknowledge a button press so the client stops its loading state
    async fn answer_callback(&self, id: CallbackQueryId) -> Result<(), GatewayError>;
}

/// Resolves product image references
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Load an image; a missing image is `BotError::NotFound`
    async fn load(&self, image: &ImageRef) -> BotResult<Media>;
}

/// Serves images from a directory on disk
#[derive(Debug, Clone)]
pub struct FsMediaProvider {
    root: PathBuf,
}

impl FsMediaProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl MediaProvider for FsMediaProvider {
    async fn load(&self, image: &ImageRef) -> BotResult<Media> {
        let path = self.root.join(image.as_str());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BotError::NotFound(format!("image {}", path.display())));
            }
            Err(e) => return Err(BotError::Io(e)),
        };
        debug!(path = %path.display(), size = bytes.len(), "Loaded product image");

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.to_string());

        Ok(Media { file_name, bytes })
    }
}
