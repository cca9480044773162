//! Decides whether a live display can be edited in place or must be reposted.

use serenity::all::MessageId;

use crate::server::error::chat::ChatError;

/// Returns true when the tracked display should be deleted and sent again.
///
/// A display is only worth moving when it exists and other traffic has pushed it out
/// of the newest `window` messages of its channel. When the channel history could not
/// be fetched the display may be buried, and a fresh visible message is preferred.
///
/// # Arguments
/// - `tracked` - Message currently showing the display, if any
/// - `recent` - Newest channel message IDs (newest first), or the fetch failure
/// - `window` - How many of the newest messages count as visible
pub fn should_reposition(
    tracked: Option<MessageId>,
    recent: Result<&[MessageId], &ChatError>,
    window: usize,
) -> bool {
    let Some(tracked) = tracked else {
        return false;
    };

    match recent {
        Ok(recent) => !recent.iter().take(window).any(|id| *id == tracked),
        Err(_) => true,
    }
}
