//! Control actions and the identifiers attached to display buttons.
//!
//! Every button on a now-playing display carries a custom id of the form
//! `np:<guild_id>:<action>`. Encoding the guild in the id lets any interaction handler
//! route a click back to the right player without consulting shared state.

use serenity::all::{GuildId, UserId};
use std::fmt;
use std::str::FromStr;
use tokio::sync::oneshot;

/// Prefix shared by every now-playing control id.
pub const CONTROL_ID_PREFIX: &str = "np";

/// Reply to clicks on a display that no longer has a listener.
pub const INACTIVE_PLAYER_REPLY: &str = "This player is no longer active.";

/// Playback action requested by clicking a display control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Pause,
    Resume,
    Skip,
    Stop,
    Shuffle,
    LoopToggle,
    ViewQueue,
    Refresh,
    VolumeDown,
    Mute,
    VolumeUp,
}

impl ControlAction {
    /// Every action, in display order.
    pub const ALL: [ControlAction; 11] = [
        Self::Pause,
        Self::Resume,
        Self::Skip,
        Self::Stop,
        Self::Shuffle,
        Self::LoopToggle,
        Self::ViewQueue,
        Self::Refresh,
        Self::VolumeDown,
        Self::Mute,
        Self::VolumeUp,
    ];

    /// Stable wire name used inside control ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Skip => "skip",
            Self::Stop => "stop",
            Self::Shuffle => "shuffle",
            Self::LoopToggle => "loop",
            Self::ViewQueue => "queue",
            Self::Refresh => "refresh",
            Self::VolumeDown => "vol_down",
            Self::Mute => "mute",
            Self::VolumeUp => "vol_up",
        }
    }

    fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == value)
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a custom id is not a now-playing control id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a now-playing control id")]
pub struct InvalidControlId(pub String);

/// Guild-scoped control identifier carried by a display button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId {
    pub guild_id: GuildId,
    pub action: ControlAction,
}

impl ControlId {
    pub fn new(guild_id: GuildId, action: ControlAction) -> Self {
        Self { guild_id, action }
    }

    /// Encodes the id into the button custom id format.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            CONTROL_ID_PREFIX,
            self.guild_id.get(),
            self.action.as_str()
        )
    }

    /// Whether a raw custom id belongs to the now-playing display.
    pub fn is_control_id(custom_id: &str) -> bool {
        custom_id
            .strip_prefix(CONTROL_ID_PREFIX)
            .is_some_and(|rest| rest.starts_with(':'))
    }
}

impl FromStr for ControlId {
    type Err = InvalidControlId;

    fn from_str(custom_id: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidControlId(custom_id.to_string());

        let mut parts = custom_id.splitn(3, ':');
        if parts.next() != Some(CONTROL_ID_PREFIX) {
            return Err(invalid());
        }

        let guild_id = parts
            .next()
            .and_then(|id| id.parse::<u64>().ok())
            .filter(|id| *id != 0)
            .map(GuildId::new)
            .ok_or_else(invalid)?;

        let action = parts
            .next()
            .and_then(ControlAction::from_wire)
            .ok_or_else(invalid)?;

        Ok(Self { guild_id, action })
    }
}

/// Reply the listener hands back to the platform for a single click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlReply {
    /// Silently acknowledge the click.
    Acknowledge,
    /// Respond with a message only the clicking user can see.
    Ephemeral(String),
}

/// A control click delivered to a display's interaction listener.
///
/// The platform adapter waits on `reply` to answer the interaction, so a listener must
/// always send a reply, even when the forwarded action failed.
#[derive(Debug)]
pub struct ControlClick {
    pub custom_id: String,
    pub user_id: UserId,
    pub reply: oneshot::Sender<ControlReply>,
}

impl ControlClick {
    pub fn new(
        custom_id: impl Into<String>,
        user_id: UserId,
    ) -> (Self, oneshot::Receiver<ControlReply>) {
        let (reply, rx) = oneshot::channel();
        (
            Self {
                custom_id: custom_id.into(),
                user_id,
                reply,
            },
            rx,
        )
    }

    /// Sends the reply; a dropped receiver means the platform already timed out.
    pub fn respond(self, reply: ControlReply) {
        let _ = self.reply.send(reply);
    }
}
