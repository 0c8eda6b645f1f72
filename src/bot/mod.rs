//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `actions`: Commands, callback data and platform-neutral inbound events
//! - `dispatcher`: Routes inbound events, including checkout fallbacks
//! - `message_handler`: Handles commands, free text and attachments
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `dialogue_manager`: Drives the checkout conversation
//! - `ui_builder`: Creates keyboards and formats messages
//! - `telegram`: Telegram implementation of the messaging gateway

pub mod actions;
pub mod callback_handler;
pub mod dialogue_manager;
pub mod dispatcher;
pub mod message_handler;
pub mod telegram;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use dispatcher::{dispatch, schema};
pub use message_handler::message_handler;
pub use telegram::TelegramGateway;

pub use actions::{Action, Attachment, Command, Event, Inbound};
