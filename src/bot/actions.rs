//! Inbound actions: bot commands, inline-button callback data, and the
//! platform-neutral [`Inbound`] event the dispatcher routes.

use teloxide::types::{CallbackQueryId, ChatId, MessageId, UserId};
use teloxide::utils::command::BotCommands;

use crate::catalog::ProductId;

const NEXT_PRODUCT_PREFIX: &str = "next_product_";
const PREV_PRODUCT_PREFIX: &str = "prev_product_";
const ADD_TO_CART_PREFIX: &str = "add_to_cart_";
const REMOVE_FROM_CART_PREFIX: &str = "remove_from_cart_";

/// Commands registered with Telegram
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "open the main menu")]
    Start,
    #[command(description = "abort the current checkout")]
    Cancel,
}

/// Inline button actions, encoded as callback data
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ViewProducts,
    /// Carries the position the button was rendered at; paging uses the
    /// stored cursor
    NextProduct(usize),
    PrevProduct(usize),
    AddToCart(ProductId),
    ViewCart,
    RemoveFromCart(ProductId),
    Checkout,
    ConfirmOrder,
    CancelOrder,
    MainMenu,
}

impl Action {
    /// Parse callback data; unknown data yields `None`
    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "view_products" => Action::ViewProducts,
            "view_cart" => Action::ViewCart,
            "checkout" => Action::Checkout,
            "confirm_order" => Action::ConfirmOrder,
            "cancel_order" => Action::CancelOrder,
            "main_menu" => Action::MainMenu,
            _ => {
                if let Some(index) = data.strip_prefix(NEXT_PRODUCT_PREFIX) {
                    Action::NextProduct(index.parse().unwrap_or(0))
                } else if let Some(index) = data.strip_prefix(PREV_PRODUCT_PREFIX) {
                    Action::PrevProduct(index.parse().unwrap_or(0))
                } else if let Some(id) = data.strip_prefix(ADD_TO_CART_PREFIX) {
                    Action::AddToCart(ProductId::new(id))
                } else if let Some(id) = data.strip_prefix(REMOVE_FROM_CART_PREFIX) {
                    Action::RemoveFromCart(ProductId::new(id))
                } else {
                    return None;
                }
            }
        };
        Some(action)
    }

    /// Callback data for this action
    pub fn callback_data(&self) -> String {
        match self {
            Action::ViewProducts => "view_products".to_string(),
            Action::NextProduct(index) => format!("{NEXT_PRODUCT_PREFIX}{index}"),
            Action::PrevProduct(index) => format!("{PREV_PRODUCT_PREFIX}{index}"),
            Action::AddToCart(id) => format!("{ADD_TO_CART_PREFIX}{id}"),
            Action::ViewCart => "view_cart".to_string(),
            Action::RemoveFromCart(id) => format!("{REMOVE_FROM_CART_PREFIX}{id}"),
            Action::Checkout => "checkout".to_string(),
            Action::ConfirmOrder => "confirm_order".to_string(),
            Action::CancelOrder => "cancel_order".to_string(),
            Action::MainMenu => "main_menu".to_string(),
        }
    }
}

/// Kind of a non-text message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attachment {
    Photo,
    Video,
    Document,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// A slash command the bot does not know
    UnknownCommand(String),
    Text(String),
    Attachment(Attachment),
    /// Inline button press on `message`
    Callback {
        id: CallbackQueryId,
        message: MessageId,
        data: String,
    },
}

/// One update from a user, stripped of platform details
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub user: UserId,
    pub chat: ChatId,
    pub event: Event,
}

impl Inbound {
    pub fn new(user: UserId, chat: ChatId, event: Event) -> Self {
        Self { user, chat, event }
    }

    /// Classify a text message, recognising bot commands
    pub fn from_text(user: UserId, chat: ChatId, text: &str, bot_name: &str) -> Self {
        let event = if text.starts_with('/') {
            match Command::parse(text, bot_name) {
                Ok(command) => Event::Command(command),
                Err(_) => Event::UnknownCommand(text.to_string()),
            }
        } else {
            Event::Text(text.to_string())
        };
        Self::new(user, chat, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_data() {
        assert_eq!(Action::parse("view_products"), Some(Action::ViewProducts));
        assert_eq!(Action::parse("next_product_2"), Some(Action::NextProduct(2)));
        assert_eq!(Action::parse("prev_product_x"), Some(Action::PrevProduct(0)));
        assert_eq!(
            Action::parse("add_to_cart_p1"),
            Some(Action::AddToCart("p1".into()))
        );
        assert_eq!(
            Action::parse("remove_from_cart_p2"),
            Some(Action::RemoveFromCart("p2".into()))
        );
        assert_eq!(Action::parse("confirm_order"), Some(Action::ConfirmOrder));
        assert_eq!(Action::parse("edit_3"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn test_callback_data_format() {
        assert_eq!(Action::NextProduct(1).callback_data(), "next_product_1");
        assert_eq!(
            Action::RemoveFromCart("p1".into()).callback_data(),
            "remove_from_cart_p1"
        );
    }

    #[test]
    fn test_classify_text() {
        let user = UserId(1);
        let chat = ChatId(1);

        let inbound = Inbound::from_text(user, chat, "/start", "store_bot");
        assert_eq!(inbound.event, Event::Command(Command::Start));

        let inbound = Inbound::from_text(user, chat, "/cancel@store_bot", "store_bot");
        assert_eq!(inbound.event, Event::Command(Command::Cancel));

        let inbound = Inbound::from_text(user, chat, "/help", "store_bot");
        assert_eq!(inbound.event, Event::UnknownCommand("/help".to_string()));

        let inbound = Inbound::from_text(user, chat, "+1234567890", "store_bot");
        assert_eq!(inbound.event, Event::Text("+1234567890".to_string()));
    }
}
