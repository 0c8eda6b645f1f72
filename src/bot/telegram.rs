//! Telegram implementation of the messaging gateway

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto,
};

use crate::errors::GatewayError;
use crate::gateway::{Gateway, Media, MessageRef};

/// Gateway backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn input_file(photo: Media) -> InputFile {
    InputFile::memory(photo.bytes).file_name(photo.file_name)
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn send_text(
        &self,
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, GatewayError> {
        let request = self.bot.send_message(chat, text);
        let sent = match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(MessageRef { chat, id: sent.id })
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: Media,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MessageRef, GatewayError> {
        let sent = self
            .bot
            .send_photo(chat, input_file(photo))
            .caption(caption)
            .reply_markup(keyboard)
            .await?;
        Ok(MessageRef { chat, id: sent.id })
    }

    async fn edit_text(
        &self,
        message: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), GatewayError> {
        let request = self.bot.edit_message_text(message.chat, message.id, text);
        match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn edit_photo(
        &self,
        message: MessageRef,
        photo: Media,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), GatewayError> {
        let media = InputMedia::Photo(InputMediaPhoto::new(input_file(photo)).caption(caption));
        self.bot
            .edit_message_media(message.chat, message.id, media)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, id: CallbackQueryId) -> Result<(), GatewayError> {
        self.bot.answer_callback_query(id).await?;
        Ok(())
    }
}
