//! Interaction listener bound to one display message.
//!
//! The listener lives as long as its message: it is shut down explicitly by the
//! session that owns it, or ends on its own when the click subscription closes. It
//! never relies on a timeout to bound its lifetime.

use dioxus_logger::tracing;
use serenity::all::{ChannelId, GuildId, MessageId};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::server::{
    model::control::{ControlClick, ControlId, ControlReply, INACTIVE_PLAYER_REPLY},
    service::{chat::ChatClient, playback::PlaybackEngine},
};

use super::render::render_controls;

const FOREIGN_CONTROL_REPLY: &str = "This control belongs to a different player.";

/// Why a listener is being shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// The message is gone or about to be deleted; nothing to clean up on it.
    MessageDeleted,
    /// The message stays in the channel; its controls are disabled.
    Retired,
}

/// Owned handle of a running listener.
///
/// Dropping the handle without calling `cancel` retires the listener.
pub struct ListenerHandle {
    shutdown: watch::Sender<Option<Teardown>>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Signals shutdown. No click received after this call is forwarded.
    pub fn cancel(self, teardown: Teardown) {
        self.shutdown.send_replace(Some(teardown));
    }

    /// Whether the listener has exited, on request or because its subscription closed.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Everything a listener needs to act on clicks for one message.
pub(super) struct ListenerContext {
    pub chat: Arc<dyn ChatClient>,
    pub engine: Arc<dyn PlaybackEngine>,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// Subscribes to the message's controls and spawns its listener.
pub(super) fn spawn(context: ListenerContext) -> ListenerHandle {
    let clicks = context.chat.subscribe_controls(context.message_id);
    let (shutdown, shutdown_rx) = watch::channel(None);

    let task = tokio::spawn(run(context, clicks, shutdown_rx));

    ListenerHandle { shutdown, task }
}

async fn run(
    context: ListenerContext,
    mut clicks: mpsc::UnboundedReceiver<ControlClick>,
    mut shutdown: watch::Receiver<Option<Teardown>>,
) {
    let teardown = loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                let requested = *shutdown.borrow();
                break requested.unwrap_or(Teardown::Retired);
            }
            click = clicks.recv() => {
                let Some(click) = click else {
                    break Teardown::Retired;
                };

                let requested = *shutdown.borrow();
                if let Some(teardown) = requested {
                    click.respond(ControlReply::Ephemeral(INACTIVE_PLAYER_REPLY.to_string()));
                    break teardown;
                }

                handle_click(&context, click).await;
            }
        }
    };

    context.chat.unsubscribe_controls(context.message_id);

    // Answer clicks that were queued before the subscription closed
    clicks.close();
    while let Ok(click) = clicks.try_recv() {
        click.respond(ControlReply::Ephemeral(INACTIVE_PLAYER_REPLY.to_string()));
    }

    if teardown == Teardown::Retired {
        let controls = render_controls(context.guild_id).disabled();
        if let Err(e) = context
            .chat
            .edit_controls(context.channel_id, context.message_id, &controls)
            .await
        {
            tracing::debug!(
                "Could not disable controls on display {} in guild {}: {}",
                context.message_id,
                context.guild_id,
                e
            );
        }
    }

    tracing::debug!(
        "Control listener for display {} in guild {} stopped",
        context.message_id,
        context.guild_id
    );
}

async fn handle_click(context: &ListenerContext, click: ControlClick) {
    let id = match click.custom_id.parse::<ControlId>() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Ignoring click on display {}: {}", context.message_id, e);
            click.respond(ControlReply::Acknowledge);
            return;
        }
    };

    if id.guild_id != context.guild_id {
        tracing::warn!(
            "Control for guild {} clicked on display of guild {}",
            id.guild_id,
            context.guild_id
        );
        click.respond(ControlReply::Ephemeral(FOREIGN_CONTROL_REPLY.to_string()));
        return;
    }

    tracing::debug!(
        "User {} pressed {} on display of guild {}",
        click.user_id,
        id.action,
        context.guild_id
    );

    let reply = match context.engine.apply(context.guild_id, id.action).await {
        Ok(None) => ControlReply::Acknowledge,
        Ok(Some(text)) => ControlReply::Ephemeral(text),
        Err(e) => {
            tracing::error!(
                "Failed to apply {} for guild {}: {}",
                id.action,
                context.guild_id,
                e
            );
            ControlReply::Ephemeral(e.to_string())
        }
    };

    click.respond(reply);
}
