//! Dialogue Manager module for driving the checkout conversation
//!
//! The state machine itself lives in [`crate::checkout`]; this module sends
//! the prompts and summaries for each transition and applies the resulting
//! session and cart changes.

use teloxide::types::{ChatId, InlineKeyboardMarkup, UserId};
use tracing::{debug, info, warn};

// Import localization
use crate::localization::t;

// Import checkout types
use crate::checkout::{CheckoutInput, CheckoutState, Transition};
use crate::errors::{BotResult, ValidationError};
use crate::gateway::{Gateway, MessageRef};
use crate::storefront::Storefront;

// Import UI builder functions
use super::ui_builder::{
    back_to_menu_keyboard, confirmation_keyboard, empty_cart_keyboard, format_order_summary,
};

/// Edit the message a button was pressed on, or send a new one
async fn respond(
    gateway: &dyn Gateway,
    chat: ChatId,
    origin: Option<MessageRef>,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> BotResult<()> {
    match origin {
        Some(message) => gateway.edit_text(message, text, keyboard).await?,
        None => {
            gateway.send_text(chat, text, keyboard).await?;
        }
    }
    Ok(())
}

/// Start (or restart) checkout for the user's current cart
pub async fn begin_checkout(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
) -> BotResult<()> {
    let cart = app.carts().get_cart(user);

    if cart.is_empty() {
        if app.sessions().end(user).is_some() {
            info!(user_id = %user, "Discarded checkout session, cart is now empty");
        }
        debug!(user_id = %user, "Checkout requested with an empty cart");
        gateway
            .send_text(chat, t("checkout-empty-cart"), Some(empty_cart_keyboard()))
            .await?;
        return Ok(());
    }

    gateway
        .send_text(chat, t("checkout-ask-phone"), None)
        .await?;

    let overridden = app.sessions().begin(user, cart);
    info!(user_id = %user, overridden, "Checkout started");
    Ok(())
}

/// Feed one input to the user's active checkout session
pub async fn handle_checkout_input(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
    origin: Option<MessageRef>,
    input: CheckoutInput,
) -> BotResult<()> {
    let Some(state) = app.sessions().get(user) else {
        debug!(user_id = %user, input = ?input, "Ignoring checkout input without an active session");
        return Ok(());
    };

    match state.step(input) {
        Transition::Unchanged(_) => {
            debug!(user_id = %user, "Checkout input does not apply to the current state");
        }
        Transition::Reprompt { error, .. } => {
            debug!(user_id = %user, error = %error, "Checkout input rejected");
            let prompt = match error {
                ValidationError::Phone => t("checkout-invalid-phone"),
                ValidationError::Address => t("checkout-invalid-address"),
            };
            gateway.send_text(chat, prompt, None).await?;
        }
        Transition::Advance(next) => {
            match &next {
                CheckoutState::AwaitingPhone { .. } => {
                    gateway.send_text(chat, t("checkout-ask-phone"), None).await?;
                }
                CheckoutState::AwaitingAddress { .. } => {
                    gateway
                        .send_text(chat, t("checkout-ask-address"), None)
                        .await?;
                }
                CheckoutState::AwaitingConfirmation {
                    cart,
                    phone,
                    address,
                } => {
                    let summary = format_order_summary(cart, phone, address);
                    gateway
                        .send_text(chat, summary, Some(confirmation_keyboard()))
                        .await?;
                }
            }
            app.sessions().replace(user, next);
        }
        Transition::Completed(order) => {
            respond(
                gateway,
                chat,
                origin,
                t("order-confirmed"),
                Some(back_to_menu_keyboard()),
            )
            .await?;

            // Only after the user has seen the confirmation
            app.carts().clear_cart(user);
            app.sessions().end(user);

            info!(
                user_id = %user,
                items = order.cart.item_count(),
                total = %order.total(),
                placed_at = %order.placed_at,
                "Order placed"
            );
        }
        Transition::Cancelled => {
            app.sessions().end(user);
            info!(user_id = %user, "Order cancelled");
            respond(
                gateway,
                chat,
                origin,
                t("order-cancelled"),
                Some(back_to_menu_keyboard()),
            )
            .await?;
        }
        Transition::Failed => {
            app.sessions().end(user);
            warn!(user_id = %user, "Unexpected input while awaiting order confirmation");
            respond(gateway, chat, origin, t("order-failed"), None).await?;
        }
        Transition::Aborted => {
            app.sessions().end(user);
            info!(user_id = %user, "Checkout aborted");
            gateway.send_text(chat, t("checkout-aborted"), None).await?;
        }
    }

    Ok(())
}
