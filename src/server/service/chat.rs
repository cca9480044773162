//! Chat platform seam used by the now-playing display.
//!
//! The display controller talks to Discord exclusively through the `ChatClient` trait,
//! which keeps the lifecycle logic testable with an in-memory fake. `SerenityChatClient`
//! is the production implementation backed by Serenity's HTTP client, and
//! `ControlRouter` delivers button clicks received on the gateway to the listener
//! subscribed to the clicked message.

pub mod router;

use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, GetMessages, MessageId},
    async_trait,
    http::Http,
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::server::{
    error::chat::ChatError,
    model::{
        control::ControlClick,
        display::{ControlSurface, NowPlayingDisplay},
    },
};

pub use router::ControlRouter;

/// Operations the display controller needs from the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Posts a new display message and returns its ID.
    async fn send_message(
        &self,
        channel_id: ChannelId,
        display: &NowPlayingDisplay,
    ) -> Result<MessageId, ChatError>;

    /// Replaces the content and controls of an existing display message.
    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        display: &NowPlayingDisplay,
    ) -> Result<(), ChatError>;

    /// Replaces only the controls of a message, leaving its content untouched.
    async fn edit_controls(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        controls: &ControlSurface,
    ) -> Result<(), ChatError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ChatError>;

    /// Returns the IDs of the newest `limit` messages in a channel, newest first.
    async fn fetch_recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
    ) -> Result<Vec<MessageId>, ChatError>;

    /// Subscribes to control clicks on a message.
    ///
    /// A new subscription for the same message replaces the previous one.
    fn subscribe_controls(&self, message_id: MessageId) -> mpsc::UnboundedReceiver<ControlClick>;

    fn unsubscribe_controls(&self, message_id: MessageId);
}

/// `ChatClient` backed by Serenity's HTTP client.
///
/// Shares the bot's `Arc<Http>` so display updates use the same rate limiter as every
/// other Discord call made by the process.
pub struct SerenityChatClient {
    http: Arc<Http>,
    router: ControlRouter,
}

impl SerenityChatClient {
    pub fn new(http: Arc<Http>, router: ControlRouter) -> Self {
        Self { http, router }
    }
}

#[async_trait]
impl ChatClient for SerenityChatClient {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        display: &NowPlayingDisplay,
    ) -> Result<MessageId, ChatError> {
        let message = CreateMessage::new()
            .embed(display.content.to_embed())
            .components(display.controls.to_action_rows());

        let sent = channel_id.send_message(&self.http, message).await?;

        Ok(sent.id)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        display: &NowPlayingDisplay,
    ) -> Result<(), ChatError> {
        let edit_message = EditMessage::new()
            .embed(display.content.to_embed())
            .components(display.controls.to_action_rows());

        self.http
            .edit_message(channel_id, message_id, &edit_message, vec![])
            .await?;

        Ok(())
    }

    async fn edit_controls(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        controls: &ControlSurface,
    ) -> Result<(), ChatError> {
        let edit_message = EditMessage::new().components(controls.to_action_rows());

        self.http
            .edit_message(channel_id, message_id, &edit_message, vec![])
            .await?;

        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ChatError> {
        self.http
            .delete_message(channel_id, message_id, None)
            .await?;

        Ok(())
    }

    async fn fetch_recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
    ) -> Result<Vec<MessageId>, ChatError> {
        let messages = channel_id
            .messages(&self.http, GetMessages::new().limit(limit))
            .await?;

        Ok(messages.into_iter().map(|message| message.id).collect())
    }

    fn subscribe_controls(&self, message_id: MessageId) -> mpsc::UnboundedReceiver<ControlClick> {
        self.router.subscribe(message_id)
    }

    fn unsubscribe_controls(&self, message_id: MessageId) {
        self.router.unsubscribe(message_id);
    }
}
