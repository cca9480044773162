use serenity::all::{Context, EventHandler, Interaction, Ready};
use serenity::async_trait;

use crate::server::service::chat::ControlRouter;

pub mod interaction;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub router: ControlRouter,
}

impl Handler {
    pub fn new(router: ControlRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called for every interaction, including display button clicks
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.router, ctx, interaction).await;
    }
}
