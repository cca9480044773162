use dioxus_logger::tracing;
use serenity::all::{Client, GatewayIntents};
use serenity::http::Http;
use std::sync::Arc;

use crate::server::{
    bot::handler::Handler, config::Config, error::AppError, service::chat::ControlRouter,
};

/// Builds the Discord client without connecting to the gateway.
///
/// The returned HTTP client is usable immediately, so the display controller can be
/// created and orphaned displays cleaned up before any interaction arrives.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token
/// - `router` - Router receiving every now-playing control click
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - Client to start and its shared HTTP client
/// - `Err(AppError::DiscordErr)` - Client could not be built
pub async fn init_bot(
    config: &Config,
    router: ControlRouter,
) -> Result<(Client, Arc<Http>), AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(router))
        .await?;

    let http = client.http.clone();

    Ok((client, http))
}

/// Connects the bot to the gateway and runs until it shuts down.
///
/// # Returns
/// - `Ok(())` - The bot disconnected cleanly
/// - `Err(AppError::DiscordErr)` - The gateway connection failed
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
