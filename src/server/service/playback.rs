//! Playback engine seam used by the now-playing display.
//!
//! The audio engine itself lives outside this crate. The display needs two things from
//! it: a cheap synchronous "is anything playing in this guild" query for the progress
//! ticker, and somewhere to send the actions users request through display controls.
//! `PlaybackBridge` provides both over channels so any engine can plug in by consuming
//! the `EngineCommand` stream.

use dioxus_logger::tracing;
use serenity::{all::GuildId, async_trait};
use std::{
    collections::HashSet,
    sync::{Arc, PoisonError, RwLock},
};
use tokio::sync::{mpsc, oneshot};

use crate::server::{error::playback::PlaybackError, model::control::ControlAction};

/// Outcome of an applied action: optional text to show the clicking user.
pub type ActionResult = Result<Option<String>, PlaybackError>;

/// Operations the display controller needs from the playback engine.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Whether the guild currently has an active player.
    fn is_active(&self, guild_id: GuildId) -> bool;

    /// Applies a control action to the guild's player.
    ///
    /// # Returns
    /// - `Ok(None)` - Action applied, nothing to tell the user
    /// - `Ok(Some(text))` - Action applied with output for the user (e.g. the queue listing)
    /// - `Err(PlaybackError)` - The action could not be applied
    async fn apply(&self, guild_id: GuildId, action: ControlAction) -> ActionResult;
}

/// A control action addressed to the engine, with a channel for its result.
#[derive(Debug)]
pub struct EngineCommand {
    pub guild_id: GuildId,
    pub action: ControlAction,
    pub respond: oneshot::Sender<ActionResult>,
}

/// Channel-based `PlaybackEngine` handed to the display controller.
///
/// The engine marks guilds active or inactive as players start and finish, and
/// consumes `EngineCommand`s from the receiver returned by `PlaybackBridge::new`.
#[derive(Clone)]
pub struct PlaybackBridge {
    active: Arc<RwLock<HashSet<GuildId>>>,
    commands: mpsc::Sender<EngineCommand>,
}

impl PlaybackBridge {
    /// Creates a bridge and the command stream the engine must consume.
    ///
    /// # Arguments
    /// - `buffer` - Number of commands that may wait for the engine before `apply` blocks
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<EngineCommand>) {
        let (commands, rx) = mpsc::channel(buffer);
        (
            Self {
                active: Arc::new(RwLock::new(HashSet::new())),
                commands,
            },
            rx,
        )
    }

    /// Records whether the guild has an active player.
    pub fn set_active(&self, guild_id: GuildId, active: bool) {
        let mut guilds = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if active {
            guilds.insert(guild_id);
        } else {
            guilds.remove(&guild_id);
        }
    }
}

#[async_trait]
impl PlaybackEngine for PlaybackBridge {
    fn is_active(&self, guild_id: GuildId) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&guild_id)
    }

    async fn apply(&self, guild_id: GuildId, action: ControlAction) -> ActionResult {
        if !self.is_active(guild_id) {
            return Err(PlaybackError::NoActivePlayer);
        }

        let (respond, response) = oneshot::channel();
        let command = EngineCommand {
            guild_id,
            action,
            respond,
        };

        if self.commands.send(command).await.is_err() {
            tracing::warn!(
                "Playback engine stopped consuming commands, dropping {} for guild {}",
                action,
                guild_id
            );
            return Err(PlaybackError::Unavailable);
        }

        response.await.unwrap_or(Err(PlaybackError::Unavailable))
    }
}
