//! Shared fixtures: a gateway that records every outbound call and an
//! in-memory media provider.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId, UserId,
};
use teloxide::RequestError;

use storefront::bot::{Command, Event, Inbound};
use storefront::catalog::{Catalog, ImageRef};
use storefront::errors::{BotError, BotResult, GatewayError};
use storefront::gateway::{Gateway, Media, MediaProvider, MessageRef};
use storefront::storefront::Storefront;

pub const USER: UserId = UserId(42);
pub const CHAT: ChatId = ChatId(42);
pub const BUTTON_MESSAGE: MessageId = MessageId(1);

#[derive(Debug, Clone)]
pub enum Outbound {
    Text {
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Photo {
        chat: ChatId,
        file_name: String,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    },
    EditText {
        message: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    EditPhoto {
        message: MessageRef,
        file_name: String,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    },
}

impl Outbound {
    /// Visible text: message text or photo caption
    pub fn text(&self) -> &str {
        match self {
            Outbound::Text { text, .. } | Outbound::EditText { text, .. } => text,
            Outbound::Photo { caption, .. } | Outbound::EditPhoto { caption, .. } => caption,
        }
    }

    /// Callback data of every button attached to the message
    pub fn buttons(&self) -> Vec<String> {
        let keyboard = match self {
            Outbound::Text { keyboard, .. } | Outbound::EditText { keyboard, .. } => {
                keyboard.as_ref()
            }
            Outbound::Photo { keyboard, .. } | Outbound::EditPhoto { keyboard, .. } => {
                Some(keyboard)
            }
        };
        keyboard
            .map(|k| {
                k.inline_keyboard
                    .iter()
                    .flatten()
                    .filter_map(|button| match &button.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct RecordingGateway {
    outbound: Mutex<Vec<Outbound>>,
    answered: Mutex<Vec<CallbackQueryId>>,
    next_id: AtomicI32,
    failing: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(100),
            ..Default::default()
        }
    }

    /// Make every following request fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn outbound(&self) -> Vec<Outbound> {
        self.outbound.lock().unwrap().clone()
    }

    pub fn last(&self) -> Outbound {
        self.outbound().last().cloned().expect("nothing was sent")
    }

    pub fn last_text(&self) -> String {
        self.last().text().to_string()
    }

    pub fn count(&self) -> usize {
        self.outbound.lock().unwrap().len()
    }

    /// Button presses acknowledged so far, oldest first
    pub fn answered(&self) -> Vec<CallbackQueryId> {
        self.answered.lock().unwrap().clone()
    }

    fn check_failing(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            let io = std::io::Error::other("network unreachable");
            return Err(RequestError::from(Arc::new(io)).into());
        }
        Ok(())
    }

    fn record(&self, outbound: Outbound) -> Result<MessageId, GatewayError> {
        self.check_failing()?;
        self.outbound.lock().unwrap().push(outbound);
        Ok(MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send_text(
        &self,
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, GatewayError> {
        let id = self.record(Outbound::Text {
            chat,
            text,
            keyboard,
        })?;
        Ok(MessageRef { chat, id })
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: Media,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MessageRef, GatewayError> {
        let id = self.record(Outbound::Photo {
            chat,
            file_name: photo.file_name,
            caption,
            keyboard,
        })?;
        Ok(MessageRef { chat, id })
    }

    async fn edit_text(
        &self,
        message: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), GatewayError> {
        self.record(Outbound::EditText {
            message,
            text,
            keyboard,
        })?;
        Ok(())
    }

    async fn edit_photo(
        &self,
        message: MessageRef,
        photo: Media,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), GatewayError> {
        self.record(Outbound::EditPhoto {
            message,
            file_name: photo.file_name,
            caption,
            keyboard,
        })?;
        Ok(())
    }

    async fn answer_callback(&self, id: CallbackQueryId) -> Result<(), GatewayError> {
        self.check_failing()?;
        self.answered.lock().unwrap().push(id);
        Ok(())
    }
}

/// Serves a placeholder image for every reference except the missing ones
#[derive(Default)]
pub struct MemoryMedia {
    missing: HashSet<String>,
}

impl MemoryMedia {
    pub fn without(images: &[&str]) -> Self {
        Self {
            missing: images.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl MediaProvider for MemoryMedia {
    async fn load(&self, image: &ImageRef) -> BotResult<Media> {
        if self.missing.contains(image.as_str()) {
            return Err(BotError::NotFound(format!("image {image}")));
        }
        Ok(Media {
            file_name: image.to_string(),
            bytes: b"image".to_vec(),
        })
    }
}

pub fn storefront() -> Storefront {
    Storefront::new(Catalog::builtin(), Arc::new(MemoryMedia::default()))
}

pub fn callback(data: &str) -> Inbound {
    Inbound::new(
        USER,
        CHAT,
        Event::Callback {
            id: callback_id(data),
            message: BUTTON_MESSAGE,
            data: data.to_string(),
        },
    )
}

/// Callback query id the fixtures attach to a button press
pub fn callback_id(data: &str) -> CallbackQueryId {
    CallbackQueryId(format!("query-{data}"))
}

pub fn text(text: &str) -> Inbound {
    Inbound::from_text(USER, CHAT, text, "store_bot")
}

pub fn command(command: Command) -> Inbound {
    Inbound::new(USER, CHAT, Event::Command(command))
}
