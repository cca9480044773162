//! Process-wide registry of per-guild display sessions.
//!
//! Each guild owns one slot guarded by an async mutex. The controller holds the slot
//! lock for the whole of `present()` or `stop()`, including the network calls, and the
//! ticker takes the same lock for each refresh, so operations on one guild's session
//! never interleave. The map key guarantees at most one session per guild.

use serenity::all::{ChannelId, GuildId, MessageId};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};
use tokio::time::Instant;

use crate::server::model::snapshot::PlaybackSnapshot;

use super::{
    listener::{ListenerHandle, Teardown},
    ticker::TickerHandle,
};

/// Live display state of one guild.
pub struct DisplaySession {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    /// `None` while no display message exists; the session then owns no handles.
    pub message_id: Option<MessageId>,
    pub last_snapshot: PlaybackSnapshot,
    /// When `last_snapshot` was received, used to extrapolate the playback position.
    pub snapshot_at: Instant,
    /// Identity of the current ticker; bumped every time the ticker is restarted.
    pub(super) epoch: u64,
    pub(super) ticker: Option<TickerHandle>,
    pub(super) listener: Option<ListenerHandle>,
}

impl DisplaySession {
    pub(super) fn new(guild_id: GuildId, channel_id: ChannelId, snapshot: PlaybackSnapshot) -> Self {
        Self {
            guild_id,
            channel_id,
            message_id: None,
            last_snapshot: snapshot,
            snapshot_at: Instant::now(),
            epoch: 0,
            ticker: None,
            listener: None,
        }
    }

    pub(super) fn set_snapshot(&mut self, snapshot: PlaybackSnapshot) {
        self.last_snapshot = snapshot;
        self.snapshot_at = Instant::now();
    }

    /// Playback position extrapolated from the cached snapshot.
    pub fn elapsed_now(&self) -> Option<u64> {
        let since = self.snapshot_at.elapsed().as_millis();
        self.last_snapshot
            .elapsed_after(u64::try_from(since).unwrap_or(u64::MAX))
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    pub fn is_listening(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|listener| !listener.is_finished())
    }

    /// Aborts the ticker, if any.
    pub(super) fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Drops the ticker handle without aborting it; used by the ticker on itself.
    pub(super) fn release_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.release();
        }
    }

    pub(super) fn cancel_listener(&mut self, teardown: Teardown) {
        if let Some(listener) = self.listener.take() {
            listener.cancel(teardown);
        }
    }

    /// Forgets the display message and shuts down everything bound to it.
    ///
    /// # Returns
    /// - `Some(MessageId)` - The message that was tracked
    /// - `None` - No message was tracked
    pub(super) fn clear_message(&mut self, teardown: Teardown) -> Option<MessageId> {
        self.cancel_ticker();
        self.cancel_listener(teardown);
        self.message_id.take()
    }
}

/// Slot holding a guild's session, if any.
pub type SessionSlot = Arc<tokio::sync::Mutex<Option<DisplaySession>>>;

/// Map from guild to its session slot.
#[derive(Default)]
pub struct SessionRegistry {
    slots: Mutex<HashMap<GuildId, SessionSlot>>,
    epochs: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the guild's slot, creating an empty one if needed.
    pub fn slot(&self, guild_id: GuildId) -> SessionSlot {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(guild_id)
            .or_default()
            .clone()
    }

    /// Returns the guild's slot only if one exists.
    pub fn existing_slot(&self, guild_id: GuildId) -> Option<SessionSlot> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&guild_id)
            .cloned()
    }

    /// Removes the guild's slot if it is empty and nobody else holds it.
    ///
    /// Callers must drop their own clone of the slot first. A slot that another task
    /// is waiting on stays in the map so that task cannot create a session the
    /// registry no longer sees.
    pub fn release(&self, guild_id: GuildId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        let removable = slots.get(&guild_id).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot
                    .try_lock()
                    .map(|session| session.is_none())
                    .unwrap_or(false)
        });

        if removable {
            slots.remove(&guild_id);
        }
    }

    /// Guilds that currently have a slot, live or not.
    pub fn guild_ids(&self) -> Vec<GuildId> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Whether the guild currently has a session.
    pub async fn contains(&self, guild_id: GuildId) -> bool {
        match self.existing_slot(guild_id) {
            Some(slot) => slot.lock().await.is_some(),
            None => false,
        }
    }

    /// Allocates a fresh ticker identity.
    pub(super) fn next_epoch(&self) -> u64 {
        self.epochs.fetch_add(1, Ordering::Relaxed) + 1
    }
}
