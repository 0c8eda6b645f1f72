//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, UserId};
use tracing::{debug, error, warn};

// Import localization
use crate::localization::{t, t_args};

use crate::catalog::ProductId;
use crate::checkout::CheckoutInput;
use crate::errors::{BotError, BotResult};
use crate::gateway::{Gateway, MessageRef};
use crate::storefront::Storefront;

use super::actions::{Action, Event, Inbound};
use super::dialogue_manager::{begin_checkout, handle_checkout_input};
use super::dispatcher::dispatch;
use super::telegram::TelegramGateway;
use super::ui_builder::{
    cart_keyboard, cart_updated_keyboard, empty_cart_keyboard, format_cart,
    format_product_caption, item_missing_keyboard, main_menu_keyboard, product_keyboard,
};

/// Route a parsed button action
pub async fn handle_action(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
    message: MessageId,
    action: Action,
) -> BotResult<()> {
    let origin = MessageRef { chat, id: message };

    match action {
        Action::ViewProducts => view_products(app, gateway, user, chat).await,
        Action::NextProduct(_) => {
            let index = app.browse().next(user);
            display_product(app, gateway, chat, index, Some(origin)).await
        }
        Action::PrevProduct(_) => {
            let index = app.browse().prev(user);
            display_product(app, gateway, chat, index, Some(origin)).await
        }
        Action::AddToCart(product_id) => add_to_cart(app, gateway, user, chat, &product_id).await,
        Action::ViewCart => view_cart(app, gateway, user, chat).await,
        Action::RemoveFromCart(product_id) => {
            remove_from_cart(app, gateway, user, chat, &product_id).await
        }
        Action::Checkout => begin_checkout(app, gateway, user, chat).await,
        Action::ConfirmOrder => {
            handle_checkout_input(app, gateway, user, chat, Some(origin), CheckoutInput::Confirm)
                .await
        }
        Action::CancelOrder => {
            handle_checkout_input(app, gateway, user, chat, Some(origin), CheckoutInput::Cancel)
                .await
        }
        Action::MainMenu => {
            gateway
                .send_text(chat, t("main-menu"), Some(main_menu_keyboard()))
                .await?;
            Ok(())
        }
    }
}

/// Show the first product as a new photo message
pub async fn view_products(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
) -> BotResult<()> {
    let index = app.browse().reset(user);
    display_product(app, gateway, chat, index, None).await
}

/// Render the product at `index`, editing `origin` in place when given
pub async fn display_product(
    app: &Storefront,
    gateway: &dyn Gateway,
    chat: ChatId,
    index: usize,
    origin: Option<MessageRef>,
) -> BotResult<()> {
    let catalog = app.catalog();
    let product = catalog
        .at(index)
        .ok_or_else(|| BotError::NotFound(format!("product at position {index}")))?;

    let caption = format_product_caption(product, index, catalog.len());
    let keyboard = product_keyboard(product, index);

    let media = match app.media().load(&product.image).await {
        Ok(media) => media,
        Err(BotError::NotFound(what)) => {
            error!(product_id = %product.id, missing = %what, "Image file not found");
            gateway
                .send_text(
                    chat,
                    t_args("error-image-not-found", &[("name", product.name.as_str())]),
                    None,
                )
                .await?;
            return Ok(());
        }
        Err(e) => {
            error!(product_id = %product.id, error = %e, "Failed to load product image");
            gateway
                .send_text(chat, t("error-display-product"), None)
                .await?;
            return Ok(());
        }
    };

    let shown = match origin {
        Some(message) => gateway.edit_photo(message, media, caption, keyboard).await,
        None => gateway
            .send_photo(chat, media, caption, keyboard)
            .await
            .map(|_| ()),
    };

    if let Err(e) = shown {
        error!(product_id = %product.id, error = %e, "Error displaying product");
        gateway
            .send_text(chat, t("error-display-product"), None)
            .await?;
    }

    Ok(())
}

pub async fn add_to_cart(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
    product_id: &ProductId,
) -> BotResult<()> {
    let count = match app.carts().add_item(user, product_id) {
        Ok(count) => count,
        Err(BotError::NotFound(_)) => {
            warn!(user_id = %user, product_id = %product_id, "Invalid product selected");
            gateway
                .send_text(chat, t("error-invalid-product"), None)
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let name = app
        .catalog()
        .get(product_id)
        .map(|product| product.name.as_str())
        .unwrap_or(product_id.as_str());
    let count = count.to_string();
    let text = format!(
        "{}\n\n{}",
        t_args("cart-item-added", &[("name", name)]),
        t_args("cart-item-count", &[("count", count.as_str())])
    );

    gateway
        .send_text(chat, text, Some(cart_updated_keyboard()))
        .await?;
    Ok(())
}

pub async fn view_cart(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
) -> BotResult<()> {
    let cart = app.carts().get_cart(user);

    if cart.is_empty() {
        gateway
            .send_text(chat, t("cart-empty"), Some(empty_cart_keyboard()))
            .await?;
        return Ok(());
    }

    gateway
        .send_text(chat, format_cart(&cart), Some(cart_keyboard(&cart)))
        .await?;
    Ok(())
}

pub async fn remove_from_cart(
    app: &Storefront,
    gateway: &dyn Gateway,
    user: UserId,
    chat: ChatId,
    product_id: &ProductId,
) -> BotResult<()> {
    match app.carts().remove_item(user, product_id) {
        Some(product) => {
            gateway
                .send_text(
                    chat,
                    t_args("cart-item-removed", &[("name", product.name.as_str())]),
                    Some(cart_updated_keyboard()),
                )
                .await?;
        }
        None => {
            debug!(user_id = %user, product_id = %product_id, "Item not found in cart");
            gateway
                .send_text(chat, t("cart-item-missing"), Some(item_missing_keyboard()))
                .await?;
        }
    }
    Ok(())
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    app: Arc<Storefront>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    let gateway = TelegramGateway::new(bot);

    let Some(msg) = &q.message else {
        debug!(user_id = %q.from.id, "Callback query without an attached message");
        if let Err(e) = gateway.answer_callback(q.id.clone()).await {
            warn!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
        }
        return Ok(());
    };

    let inbound = Inbound::new(
        q.from.id,
        msg.chat().id,
        Event::Callback {
            id: q.id.clone(),
            message: msg.id(),
            data: q.data.clone().unwrap_or_default(),
        },
    );

    if let Err(e) = dispatch(&app, &gateway, inbound).await {
        error!(user_id = %q.from.id, error = %e, "Failed to handle callback query");
    }

    Ok(())
}
