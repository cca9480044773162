//! Errors returned by the now-playing display controller.

use thiserror::Error;

use crate::server::error::chat::ChatError;

/// Failure of `present()` after the session has been left in a consistent state.
///
/// The guild's session survives the error. Either it still tracks its previous
/// message and keeps ticking, or it tracks no message and the next `present()`
/// sends a new one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NowPlayingError {
    #[error(transparent)]
    Chat(#[from] ChatError),
}
