//! # Storefront Telegram Bot
//!
//! A Telegram bot that lets users browse a small catalog, keep a per-user
//! shopping cart and place orders through a scripted checkout conversation
//! (phone number, shipping address, confirmation).

pub mod bot;
pub mod browse;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod localization;
pub mod logging;
pub mod storefront;
