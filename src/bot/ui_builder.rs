//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::{t, t_args};

// Import storefront types
use crate::cart::CartView;
use crate::catalog::Product;

use super::actions::Action;

fn button(label: String, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.callback_data())
}

fn main_menu_row() -> Vec<InlineKeyboardButton> {
    vec![button(t("button-main-menu"), Action::MainMenu)]
}

/// Main menu: browse, cart, checkout
pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(t("button-view-products"), Action::ViewProducts)],
        vec![button(t("button-view-cart"), Action::ViewCart)],
        vec![button(t("button-checkout"), Action::Checkout)],
    ])
}

/// Navigation and "add to cart" controls for the product at `index`
pub fn product_keyboard(product: &Product, index: usize) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button(t("button-previous"), Action::PrevProduct(index)),
            button(t("button-next"), Action::NextProduct(index)),
        ],
        vec![button(
            t_args("button-add", &[("name", product.name.as_str())]),
            Action::AddToCart(product.id.clone()),
        )],
        main_menu_row(),
    ])
}

/// Caption shown under a product photo
pub fn format_product_caption(product: &Product, index: usize, count: usize) -> String {
    let price = product.price.to_string();
    let position = (index + 1).to_string();
    let count = count.to_string();
    format!(
        "{}\n{}\n\n{}",
        t_args(
            "product-title",
            &[("name", product.name.as_str()), ("price", price.as_str())]
        ),
        product.description,
        t_args(
            "product-position",
            &[("position", position.as_str()), ("count", count.as_str())]
        )
    )
}

/// Shown after adding or removing an item
pub fn cart_updated_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(t("button-view-cart"), Action::ViewCart)],
        vec![button(t("button-continue-shopping"), Action::ViewProducts)],
        main_menu_row(),
    ])
}

/// Shown when a removal targeted a product that was not in the cart
pub fn item_missing_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(t("button-view-cart"), Action::ViewCart)],
        main_menu_row(),
    ])
}

/// Shown with an empty cart
pub fn empty_cart_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(t("button-view-products"), Action::ViewProducts)],
        main_menu_row(),
    ])
}

/// Itemized cart lines, one per product
pub fn format_cart_lines(cart: &CartView) -> String {
    let mut result = String::new();

    for line in &cart.lines {
        let quantity = line.quantity.to_string();
        let amount = line.amount().to_string();
        result.push_str(&t_args(
            "cart-line",
            &[
                ("name", line.name.as_str()),
                ("quantity", quantity.as_str()),
                ("amount", amount.as_str()),
            ],
        ));
        result.push('\n');
    }

    result
}

fn format_total(cart: &CartView) -> String {
    let total = cart.total().to_string();
    t_args("cart-total", &[("total", total.as_str())])
}

/// Full cart listing with total
pub fn format_cart(cart: &CartView) -> String {
    format!(
        "{}\n\n{}\n{}",
        t("cart-title"),
        format_cart_lines(cart),
        format_total(cart)
    )
}

/// One "remove" button per line plus checkout and navigation
pub fn cart_keyboard(cart: &CartView) -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = cart
        .lines
        .iter()
        .map(|line| {
            vec![button(
                t_args("button-remove", &[("name", line.name.as_str())]),
                Action::RemoveFromCart(line.product_id.clone()),
            )]
        })
        .collect();

    buttons.push(vec![button(t("button-checkout"), Action::Checkout)]);
    buttons.push(vec![button(
        t("button-continue-shopping"),
        Action::ViewProducts,
    )]);
    buttons.push(main_menu_row());

    InlineKeyboardMarkup::new(buttons)
}

/// Order summary presented before confirmation
pub fn format_order_summary(cart: &CartView, phone: &str, address: &str) -> String {
    format!(
        "{}\n\n{}\n{}\n{}\n{}",
        t("order-summary-title"),
        format_cart_lines(cart),
        format_total(cart),
        t_args("order-summary-phone", &[("phone", phone)]),
        t_args("order-summary-address", &[("address", address)])
    )
}

pub fn confirmation_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(t("button-confirm-order"), Action::ConfirmOrder)],
        vec![button(t("button-cancel-order"), Action::CancelOrder)],
    ])
}

pub fn back_to_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![main_menu_row()])
}
