//! Routes inbound events to the storefront handlers.
//!
//! While a checkout session is active, commands and non-text messages are
//! checkout fallbacks: they end the session before anything else runs.
//! Button presses and free text go through the normal routes.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::checkout::CheckoutInput;
use crate::errors::BotResult;
use crate::gateway::Gateway;
use crate::storefront::Storefront;

use super::actions::{Action, Command, Event, Inbound};
use super::callback_handler::{callback_handler, handle_action};
use super::dialogue_manager::handle_checkout_input;
use super::message_handler::{handle_command, handle_text, message_handler};

/// Checkout input for events that abort an active session
fn checkout_fallback(event: &Event) -> Option<CheckoutInput> {
    match event {
        Event::Command(Command::Cancel) => Some(CheckoutInput::Abort),
        Event::Command(_) | Event::UnknownCommand(_) | Event::Attachment(_) => {
            Some(CheckoutInput::Unexpected)
        }
        Event::Text(_) | Event::Callback { .. } => None,
    }
}

/// Handle one inbound event
pub async fn dispatch(app: &Storefront, gateway: &dyn Gateway, inbound: Inbound) -> BotResult<()> {
    let Inbound { user, chat, event } = inbound;

    // Every button press is acknowledged, even when nothing else happens
    if let Event::Callback { id, .. } = &event {
        if let Err(e) = gateway.answer_callback(id.clone()).await {
            warn!(user_id = %user, error = %e, "Failed to answer callback query");
        }
    }

    if app.sessions().is_active(user) {
        if let Some(input) = checkout_fallback(&event) {
            handle_checkout_input(app, gateway, user, chat, None, input).await?;
            // /start still opens the menu once the session is gone
            if event != Event::Command(Command::Start) {
                return Ok(());
            }
        }
    }

    match event {
        Event::Command(command) => handle_command(gateway, user, chat, command).await,
        Event::UnknownCommand(command) => {
            debug!(user_id = %user, command = %command, "Ignoring unknown command");
            Ok(())
        }
        Event::Text(text) => handle_text(app, gateway, user, chat, text).await,
        Event::Attachment(kind) => {
            debug!(user_id = %user, kind = ?kind, "Ignoring attachment outside of checkout");
            Ok(())
        }
        Event::Callback { message, data, .. } => match Action::parse(&data) {
            Some(action) => handle_action(app, gateway, user, chat, message, action).await,
            None => {
                debug!(user_id = %user, data = %data, "Ignoring unknown callback data");
                Ok(())
            }
        },
    }
}

/// Update routing for the teloxide dispatcher
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
