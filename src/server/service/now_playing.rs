//! Live "now playing" display of each guild.
//!
//! `NowPlayingController` keeps exactly one display message per guild in sync with the
//! playback engine. Every call to `present()` either edits the existing message, moves
//! it to the bottom of the channel when chat traffic has buried it, or sends a new
//! one. A live message owns two background tasks: a progress ticker that refreshes the
//! elapsed time and a listener that forwards control clicks to the engine. Both are
//! torn down together with the message.
//!
//! All state lives in the `SessionRegistry`. Operations on one guild serialize on that
//! guild's slot lock while different guilds proceed independently.

pub mod listener;
pub mod placement;
pub mod registry;
pub mod render;
pub mod ticker;

#[cfg(test)]
mod test;

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, GuildId, MessageId};
use std::sync::Arc;

use crate::server::{
    config::DisplayConfig,
    data::now_playing_message::NowPlayingMessageRepository,
    error::{chat::ChatError, now_playing::NowPlayingError, AppError},
    model::{
        display::NowPlayingDisplay, now_playing_message::UpsertNowPlayingMessageParam,
        snapshot::PlaybackSnapshot,
    },
    service::{chat::ChatClient, playback::PlaybackEngine},
};

use self::{
    listener::{ListenerContext, Teardown},
    placement::should_reposition,
    registry::{DisplaySession, SessionRegistry},
    render::{render, render_controls},
};

/// Read-only view of a guild's display session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: Option<MessageId>,
    pub ticking: bool,
    pub listening: bool,
    pub track_title: String,
    pub paused: bool,
}

impl SessionInfo {
    fn from_session(session: &DisplaySession) -> Self {
        Self {
            guild_id: session.guild_id,
            channel_id: session.channel_id,
            message_id: session.message_id,
            ticking: session.is_ticking(),
            listening: session.is_listening(),
            track_title: session.last_snapshot.track_title.clone(),
            paused: session.last_snapshot.paused,
        }
    }
}

/// How `present()` places the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Send,
    Edit(MessageId),
    Replace,
}

/// Shared state of the controller, also reachable from its tickers.
pub(crate) struct ControllerInner {
    registry: SessionRegistry,
    chat: Arc<dyn ChatClient>,
    engine: Arc<dyn PlaybackEngine>,
    config: DisplayConfig,
    db: Option<DatabaseConnection>,
}

/// Façade over the per-guild display sessions.
///
/// Cloning the controller shares the same registry.
#[derive(Clone)]
pub struct NowPlayingController {
    inner: Arc<ControllerInner>,
}

impl NowPlayingController {
    /// Creates a controller with an empty registry.
    ///
    /// # Arguments
    /// - `chat` - Chat platform used to post, edit and delete displays
    /// - `engine` - Playback engine queried by tickers and driven by control clicks
    /// - `config` - Ticker cadence and visibility window
    /// - `db` - Optional connection used to remember display messages across restarts
    pub fn new(
        chat: Arc<dyn ChatClient>,
        engine: Arc<dyn PlaybackEngine>,
        config: DisplayConfig,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                registry: SessionRegistry::new(),
                chat,
                engine,
                config,
                db,
            }),
        }
    }

    /// Shows `snapshot` as the guild's now-playing display.
    ///
    /// Creates the display on first use. Afterwards the existing message is edited in
    /// place, unless it was posted in another channel or is no longer among the
    /// channel's newest messages, in which case it is deleted and sent again. The
    /// progress ticker is restarted on every call; a listener is started for every
    /// newly sent message.
    ///
    /// # Arguments
    /// - `guild_id` - Guild whose display to update
    /// - `channel_id` - Channel the display should appear in
    /// - `snapshot` - Current playback state
    ///
    /// # Returns
    /// - `Ok(())` - A live display shows the snapshot
    /// - `Err(NowPlayingError::Chat)` - Sending or editing failed; the session is kept
    ///   and the next call or tick retries
    pub async fn present(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        snapshot: PlaybackSnapshot,
    ) -> Result<(), NowPlayingError> {
        let inner = &self.inner;
        let slot = inner.registry.slot(guild_id);
        let mut guard = slot.lock().await;

        let session = match guard.take() {
            Some(mut session) => {
                session.set_snapshot(snapshot);
                guard.insert(session)
            }
            None => guard.insert(DisplaySession::new(guild_id, channel_id, snapshot)),
        };

        session.cancel_ticker();

        let display = render(
            guild_id,
            &session.last_snapshot,
            session.last_snapshot.elapsed_ms,
        );

        let placement = inner.placement(session, channel_id).await;
        let result = match placement {
            Placement::Send => inner.send_display(session, channel_id, &display).await,
            Placement::Replace => {
                tracing::debug!(
                    "Reposting now-playing display of guild {} in channel {}",
                    guild_id,
                    channel_id
                );
                inner.retire_message(session).await;
                inner.send_display(session, channel_id, &display).await
            }
            Placement::Edit(message_id) => {
                match inner
                    .chat
                    .edit_message(session.channel_id, message_id, &display)
                    .await
                {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_not_found() => {
                        tracing::debug!(
                            "Now-playing display {} of guild {} was deleted, sending a new one",
                            message_id,
                            guild_id
                        );
                        session.clear_message(Teardown::MessageDeleted);
                        inner.forget_message(guild_id).await;
                        inner.send_display(session, channel_id, &display).await
                    }
                    Err(e) => Err(e),
                }
            }
        };

        inner.start_ticker(session);

        result.map_err(|e| {
            tracing::error!(
                "Failed to present now-playing display for guild {}: {}",
                guild_id,
                e
            );
            NowPlayingError::from(e)
        })
    }

    /// Tears down the guild's display.
    ///
    /// Cancels the ticker and listener, deletes the message (best effort) and removes
    /// the session. Does nothing when the guild has no session. No control click is
    /// forwarded to the engine once this returns.
    pub async fn stop(&self, guild_id: GuildId) {
        self.inner.remove_session(guild_id, false).await;
    }

    /// Stops every session whose guild no longer has an active player.
    ///
    /// Safety net for a `stop()` the engine never issued.
    ///
    /// # Returns
    /// - `usize` - Number of sessions removed
    pub async fn sweep_inactive(&self) -> usize {
        let mut stopped = 0;

        for guild_id in self.inner.registry.guild_ids() {
            if self.inner.engine.is_active(guild_id) {
                continue;
            }

            if self.inner.remove_session(guild_id, true).await {
                stopped += 1;
            }
        }

        stopped
    }

    /// Returns a read-only view of the guild's session, if any.
    pub async fn session_info(&self, guild_id: GuildId) -> Option<SessionInfo> {
        let slot = self.inner.registry.existing_slot(guild_id)?;
        let guard = slot.lock().await;

        guard.as_ref().map(SessionInfo::from_session)
    }

    /// Guilds that currently have a display session.
    pub async fn active_guilds(&self) -> Vec<GuildId> {
        let mut guilds = Vec::new();

        for guild_id in self.inner.registry.guild_ids() {
            if self.inner.registry.contains(guild_id).await {
                guilds.push(guild_id);
            }
        }

        guilds.sort();
        guilds
    }

    /// Deletes display messages remembered from a previous run of the bot.
    ///
    /// Must run before the first `present()`; every remembered record is consumed,
    /// whether its message could be deleted or not.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of leftover messages removed from Discord
    /// - `Err(AppError::DbErr)` - Remembered records could not be listed
    pub async fn recover_orphaned_displays(&self) -> Result<usize, AppError> {
        let Some(db) = &self.inner.db else {
            return Ok(0);
        };

        let repo = NowPlayingMessageRepository::new(db);
        let mut removed = 0;

        for record in repo.get_all().await? {
            match record.discord_ids() {
                Ok((channel_id, message_id)) => {
                    let channel_id = ChannelId::new(channel_id);
                    let message_id = MessageId::new(message_id);

                    match self.inner.chat.delete_message(channel_id, message_id).await {
                        Ok(()) => removed += 1,
                        Err(ChatError::NotFound) => {}
                        Err(e) => {
                            tracing::warn!(
                                "Failed to delete leftover now-playing display {} in channel {}: {}",
                                message_id,
                                channel_id,
                                e
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Discarding malformed now-playing record for guild {}: {}",
                        record.guild_id,
                        e
                    );
                }
            }

            repo.delete_by_guild_id(&record.guild_id).await?;
        }

        if removed > 0 {
            tracing::info!("Removed {} leftover now-playing displays", removed);
        }

        Ok(removed)
    }
}

impl ControllerInner {
    /// Decides where the display goes, fetching channel history only when a message
    /// already exists in the requested channel.
    async fn placement(&self, session: &DisplaySession, channel_id: ChannelId) -> Placement {
        let Some(message_id) = session.message_id else {
            return Placement::Send;
        };

        if session.channel_id != channel_id {
            return Placement::Replace;
        }

        let recent = self
            .chat
            .fetch_recent_messages(channel_id, self.config.recent_window)
            .await;

        if let Err(e) = &recent {
            tracing::debug!(
                "Could not fetch recent messages of channel {}: {}",
                channel_id,
                e
            );
        }

        let window = usize::from(self.config.recent_window);
        if should_reposition(Some(message_id), recent.as_ref().map(Vec::as_slice), window) {
            Placement::Replace
        } else {
            Placement::Edit(message_id)
        }
    }

    /// Sends a new display message and binds a listener to it.
    ///
    /// On failure the session is left without a message.
    async fn send_display(
        &self,
        session: &mut DisplaySession,
        channel_id: ChannelId,
        display: &NowPlayingDisplay,
    ) -> Result<(), ChatError> {
        session.channel_id = channel_id;

        let message_id = self.chat.send_message(channel_id, display).await?;

        session.message_id = Some(message_id);
        session.listener = Some(listener::spawn(ListenerContext {
            chat: self.chat.clone(),
            engine: self.engine.clone(),
            guild_id: session.guild_id,
            channel_id,
            message_id,
        }));

        self.remember_message(session.guild_id, channel_id, message_id)
            .await;

        tracing::debug!(
            "Sent now-playing display {} for guild {} in channel {}",
            message_id,
            session.guild_id,
            channel_id
        );

        Ok(())
    }

    /// Detaches the session from its message and deletes it.
    ///
    /// The listener is shut down before the delete so no click on the old message
    /// reaches the engine. When the delete fails for a transient reason the message
    /// stays in the channel, so its controls are disabled instead and its record is
    /// kept for `recover_orphaned_displays`.
    async fn retire_message(&self, session: &mut DisplaySession) {
        let Some(message_id) = session.clear_message(Teardown::MessageDeleted) else {
            return;
        };

        match self
            .chat
            .delete_message(session.channel_id, message_id)
            .await
        {
            Ok(()) | Err(ChatError::NotFound) => self.forget_message(session.guild_id).await,
            Err(e) => {
                tracing::warn!(
                    "Failed to delete now-playing display {} of guild {}: {}",
                    message_id,
                    session.guild_id,
                    e
                );
                self.disable_controls(session.guild_id, session.channel_id, message_id)
                    .await;
            }
        }
    }

    async fn disable_controls(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) {
        let controls = render_controls(guild_id).disabled();
        if let Err(e) = self
            .chat
            .edit_controls(channel_id, message_id, &controls)
            .await
        {
            tracing::debug!(
                "Could not disable controls on display {}: {}",
                message_id,
                e
            );
        }
    }

    /// Restarts the ticker under a fresh epoch if the session has a live message.
    fn start_ticker(self: &Arc<Self>, session: &mut DisplaySession) {
        session.cancel_ticker();
        session.epoch = self.registry.next_epoch();

        let Some(message_id) = session.message_id else {
            return;
        };

        session.ticker = Some(ticker::spawn(
            Arc::downgrade(self),
            session.guild_id,
            session.epoch,
            message_id,
            self.config.tick_interval,
        ));
    }

    /// Removes the guild's session and its message.
    ///
    /// # Arguments
    /// - `guild_id` - Guild whose session to remove
    /// - `only_if_inactive` - Re-check under the slot lock that the engine is inactive
    ///
    /// # Returns
    /// - `true` - A session was removed
    /// - `false` - No session, or the engine became active again
    async fn remove_session(&self, guild_id: GuildId, only_if_inactive: bool) -> bool {
        let Some(slot) = self.registry.existing_slot(guild_id) else {
            return false;
        };

        let mut guard = slot.lock().await;

        if only_if_inactive && self.engine.is_active(guild_id) {
            return false;
        }

        let removed = match guard.take() {
            Some(mut session) => {
                self.retire_message(&mut session).await;
                tracing::info!("Stopped now-playing display for guild {}", guild_id);
                true
            }
            None => false,
        };

        drop(guard);
        drop(slot);
        self.registry.release(guild_id);

        removed
    }

    /// Records the guild's display message; failures are logged only.
    async fn remember_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) {
        let Some(db) = &self.db else {
            return;
        };

        let param = UpsertNowPlayingMessageParam {
            guild_id: guild_id.get(),
            channel_id: channel_id.get(),
            message_id: message_id.get(),
        };

        if let Err(e) = NowPlayingMessageRepository::new(db).upsert(param).await {
            tracing::error!(
                "Failed to record now-playing display {} for guild {}: {}",
                message_id,
                guild_id,
                e
            );
        }
    }

    /// Forgets the guild's display message; failures are logged only.
    async fn forget_message(&self, guild_id: GuildId) {
        let Some(db) = &self.db else {
            return;
        };

        if let Err(e) = NowPlayingMessageRepository::new(db)
            .delete_by_guild_id(&guild_id.to_string())
            .await
        {
            tracing::error!(
                "Failed to forget now-playing display of guild {}: {}",
                guild_id,
                e
            );
        }
    }
}
