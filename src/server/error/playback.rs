//! Errors reported by the playback engine when applying a control action.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The guild has no active player to control.
    #[error("Nothing is playing in this server")]
    NoActivePlayer,

    /// The engine refused the action (e.g. skipping with an empty queue).
    #[error("{0}")]
    Rejected(String),

    /// The engine is not accepting commands.
    #[error("Playback engine is unavailable")]
    Unavailable,
}
