//! Playback snapshot model consumed by the now-playing display.
//!
//! A `PlaybackSnapshot` describes one renderable moment of playback for a guild. The
//! playback engine produces a new snapshot on track start, on every state change and on
//! track end; the display controller never mutates one, it only caches the latest
//! snapshot between engine updates so the progress ticker can re-render it.

use serde::{Deserialize, Serialize};
use serenity::all::UserId;

/// Platform a track was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    YouTube,
    Spotify,
    SoundCloud,
    Deezer,
    AppleMusic,
    Bandcamp,
    Twitch,
    Http,
    Local,
    #[default]
    Unknown,
}

impl TrackSource {
    /// Human readable platform name shown on the display.
    pub fn label(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::Spotify => "Spotify",
            Self::SoundCloud => "SoundCloud",
            Self::Deezer => "Deezer",
            Self::AppleMusic => "Apple Music",
            Self::Bandcamp => "Bandcamp",
            Self::Twitch => "Twitch",
            Self::Http => "Direct link",
            Self::Local => "Local file",
            Self::Unknown => "Unknown source",
        }
    }

    /// Embed accent colour associated with the platform.
    pub fn color(self) -> u32 {
        match self {
            Self::YouTube => 0xff0000,
            Self::Spotify => 0x1db954,
            Self::SoundCloud => 0xff5500,
            Self::Deezer => 0xa238ff,
            Self::AppleMusic => 0xfa243c,
            Self::Bandcamp => 0x629aa9,
            Self::Twitch => 0x9146ff,
            Self::Http | Self::Local | Self::Unknown => 0x5865f2,
        }
    }
}

/// Repeat behaviour of the guild's player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    #[default]
    Off,
    Track,
    Queue,
}

impl LoopMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Track => "Track",
            Self::Queue => "Queue",
        }
    }
}

/// Immutable description of one playback moment for a guild.
///
/// Durations are carried in milliseconds. `elapsed_ms` and `total_ms` are optional
/// because some sources (live streams, unknown-length HTTP streams) cannot report them;
/// the progress line is only rendered when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub track_title: String,
    pub track_url: String,
    pub artist: String,
    /// Pre-formatted duration as reported by the source (e.g. `"3:45"`).
    pub duration_label: String,
    pub duration_ms: u64,
    pub source: TrackSource,
    pub thumbnail_url: Option<String>,
    pub requester_id: UserId,
    /// Player volume, 0-100. Values above 100 are clamped when rendered.
    pub volume_percent: u8,
    pub loop_mode: LoopMode,
    pub queue_size: usize,
    /// Estimated play time of everything queued after the current track.
    pub queue_estimated_remaining_ms: u64,
    pub next_track_title: Option<String>,
    pub elapsed_ms: Option<u64>,
    pub total_ms: Option<u64>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub is_stream: bool,
}

impl PlaybackSnapshot {
    /// Whether playback time is currently advancing.
    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    /// Whether the display for this snapshot needs periodic progress refreshes.
    ///
    /// Paused tracks and live streams render the same content until the engine pushes
    /// a new snapshot, so no ticker is needed for them.
    pub fn needs_progress_refresh(&self) -> bool {
        self.is_playing()
            && !self.is_stream
            && self.elapsed_ms.is_some()
            && self.total_ms.is_some_and(|total| total > 0)
    }

    /// Elapsed time after `since_ms` milliseconds of uninterrupted playback.
    ///
    /// Returns the cached elapsed time unchanged while paused. The result is not
    /// clamped to `total_ms`; the renderer handles overshoot.
    pub fn elapsed_after(&self, since_ms: u64) -> Option<u64> {
        let elapsed = self.elapsed_ms?;
        if self.is_playing() {
            Some(elapsed.saturating_add(since_ms))
        } else {
            Some(elapsed)
        }
    }
}
