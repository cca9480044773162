use dioxus_logger::tracing::{self, Level};
use std::sync::Arc;

use nowplaying::server::{
    bot,
    config::Config,
    error::AppError,
    scheduler::display_sweep,
    service::{
        chat::{ControlRouter, SerenityChatClient},
        now_playing::NowPlayingController,
        playback::PlaybackBridge,
    },
    startup,
};

/// Engine commands that may wait before control clicks block.
const ENGINE_COMMAND_BUFFER: usize = 64;

#[tokio::main]
async fn main() {
    if let Err(e) = dioxus_logger::init(Level::INFO) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;

    tracing::info!("Starting now-playing bot");

    let router = ControlRouter::new();
    let (bot_client, discord_http) = bot::start::init_bot(&config, router.clone()).await?;

    let chat = Arc::new(SerenityChatClient::new(discord_http, router));
    let (engine, commands) = PlaybackBridge::new(ENGINE_COMMAND_BUFFER);
    tokio::spawn(startup::refuse_engine_commands(commands));

    let controller =
        NowPlayingController::new(chat, Arc::new(engine), config.display.clone(), Some(db));

    // Must finish before the first display is presented
    if let Err(e) = controller.recover_orphaned_displays().await {
        tracing::error!("Failed to clean up leftover now-playing displays: {}", e);
    }

    display_sweep::start_scheduler(controller.clone(), &config.sweep_cron).await?;

    bot::start::start_bot(bot_client).await
}
