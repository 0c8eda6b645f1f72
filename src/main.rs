use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use storefront::bot::{self, Command};
use storefront::catalog::Catalog;
use storefront::config::Config;
use storefront::gateway::FsMediaProvider;
use storefront::logging::{init_tracing, LogFormat};
use storefront::storefront::Storefront;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_tracing(LogFormat::from_env());

    info!("Starting Storefront Telegram Bot");

    // A missing token is fatal, there is no retry
    let config = Config::from_env()?;
    info!(config = ?config, "Configuration loaded");

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    let media = Arc::new(FsMediaProvider::new(&config.media_dir));
    let app = Arc::new(Storefront::new(catalog, media));

    // Initialize the bot
    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await?;
    info!(username = %me.username(), "Bot initialized");

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Starting dispatcher");

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![Arc::clone(&app), me])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    app.shutdown();
    info!("Storefront bot stopped");

    Ok(())
}
