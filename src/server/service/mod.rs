//! Service layer for the now-playing display.
//!
//! - **chat** - Chat platform seam and the serenity-backed client
//! - **playback** - Playback engine seam and the channel-based bridge
//! - **now_playing** - Per-guild display lifecycle built on both seams

pub mod chat;
pub mod now_playing;
pub mod playback;
