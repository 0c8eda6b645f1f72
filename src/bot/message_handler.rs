//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Me, UserId};
use tracing::{debug, error};

// Import localization
use crate::localization::t;

use crate::checkout::CheckoutInput;
use crate::errors::BotResult;
use crate::gateway::Gateway;
use crate::storefront::Storefront;

use super::actions::{Attachment, Command, Event, Inbound};
use super::dialogue_manager::handle_checkout_input;
use super::dispatcher::dispatch;
use super::telegram::TelegramGateway;
use super::ui_builder::main_menu_keyboard;

/// Turn a Telegram message into an inbound event
pub fn classify_message(msg: &Message, bot_name: &str) -> Option<Inbound> {
    let user = msg.from.as_ref()?.id;
    let chat = msg.chat.id;

    if let Some(text) = msg.text() {
        return Some(Inbound::from_text(user, chat, text, bot_name));
    }

    let attachment = if msg.photo().is_some() {
        Attachment::Photo
    } else if msg.video().is_some() {
        Attachment::Video
    } else if msg.document().is_some() {
        Attachment::Document
    } else {
        Attachment::Other
    };
    Some(Inbound::new(user, chat, Event::Attachment(attachment)))
}

/// Send the welcome message with the main menu
pub async fn start(gateway: &dyn Gateway, chat: ChatId) -> BotResult<()> {
    gateway
        .send_text(chat, t("welcome"), Some(main_menu_keyboard()))
        .await?;
    Ok(())
}

/// Handle a recognised command outside of checkout
pub async fn handle_command(
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
    command: Command,
) -> BotResult<()> {
    match command {
        Command::Start => start(gateway, chat).await,
        Command::Cancel => {
            debug!(user_id = %user, "Cancel requested without an active checkout");
            Ok(())
        }
    }
}

/// Free text only means something while a checkout is waiting for input
pub async fn handle_text(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
    text: String,
) -> BotResult<()> {
    if !app.sessions().is_active(user) {
        debug!(user_id = %user, message_length = text.len(), "Ignoring text outside of checkout");
        return Ok(());
    }

    handle_checkout_input(app, gateway, user, chat, None, CheckoutInput::Text(text)).await
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    me: Me,
    app: Arc<Storefront>,
) -> Result<()> {
    let Some(inbound) = classify_message(&msg, me.username()) else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without a sender");
        return Ok(());
    };
    debug!(user_id = %inbound.user, event = ?inbound.event, "Received message from user");

    let user = inbound.user;
    let gateway = TelegramGateway::new(bot);
    if let Err(e) = dispatch(&app, &gateway, inbound).await {
        error!(user_id = %user, error = %e, "Failed to handle message");
    }

    Ok(())
}
