//! Component interaction handler routing display clicks to their listeners.
//!
//! Discord expects an answer to every interaction within three seconds. The click is
//! handed to the listener of the clicked message, which replies once the playback
//! engine has applied the action; when no listener answers in time the click is
//! acknowledged anyway so the user does not see an error.

use dioxus_logger::tracing;
use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    Interaction,
};
use std::time::Duration;

use crate::server::{
    model::control::{ControlClick, ControlId, ControlReply, INACTIVE_PLAYER_REPLY},
    service::chat::ControlRouter,
};

/// How long to wait for a listener before acknowledging on its behalf.
const REPLY_TIMEOUT: Duration = Duration::from_millis(2500);

/// Handles an interaction, ignoring everything but now-playing controls.
pub async fn handle_interaction(router: &ControlRouter, ctx: Context, interaction: Interaction) {
    let Interaction::Component(component) = interaction else {
        return;
    };

    if !ControlId::is_control_id(&component.data.custom_id) {
        return;
    }

    let reply = route_click(router, &component).await;

    let response = match reply {
        ControlReply::Acknowledge => CreateInteractionResponse::Acknowledge,
        ControlReply::Ephemeral(text) => CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(true),
        ),
    };

    if let Err(e) = component.create_response(&ctx, response).await {
        tracing::warn!(
            "Failed to answer control click {} on message {}: {}",
            component.data.custom_id,
            component.message.id,
            e
        );
    }
}

/// Delivers the click to the message's listener and waits for its reply.
async fn route_click(router: &ControlRouter, component: &ComponentInteraction) -> ControlReply {
    let (click, reply) = ControlClick::new(component.data.custom_id.clone(), component.user.id);

    if router.dispatch(component.message.id, click).is_err() {
        tracing::debug!(
            "Control click on message {} without a live display",
            component.message.id
        );
        return ControlReply::Ephemeral(INACTIVE_PLAYER_REPLY.to_string());
    }

    match tokio::time::timeout(REPLY_TIMEOUT, reply).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(_)) => ControlReply::Ephemeral(INACTIVE_PLAYER_REPLY.to_string()),
        Err(_) => {
            tracing::warn!(
                "Playback engine did not answer control click on message {} in time",
                component.message.id
            );
            ControlReply::Acknowledge
        }
    }
}
