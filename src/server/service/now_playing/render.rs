//! Pure rendering of playback snapshots into display content and controls.
//!
//! Nothing in this module touches the network, the clock or the session registry, so
//! the duration and progress arithmetic can be tested in isolation.

use serenity::all::GuildId;

use crate::server::model::{
    control::{ControlAction, ControlId},
    display::{
        ControlButton, ControlStyle, ControlSurface, DisplayContent, DisplayField,
        NowPlayingDisplay,
    },
    snapshot::PlaybackSnapshot,
};

/// Number of segments in the progress bar.
pub const PROGRESS_SEGMENTS: u32 = 20;

const FILLED_SEGMENT: char = '▰';
const EMPTY_SEGMENT: char = '▱';

/// Discord rejects embeds whose description exceeds this many characters.
pub const DESCRIPTION_LIMIT: usize = 4096;
/// Discord rejects embed fields whose value exceeds this many characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;
/// Discord rejects embeds whose text adds up to more than this many characters.
pub const EMBED_TEXT_LIMIT: usize = 6000;

/// Longest track title, artist or next-up title shown before truncation.
const LABEL_LIMIT: usize = 256;
/// Longest track URL linked from the display; longer URLs are left out.
const LINK_URL_LIMIT: usize = 2048;

/// Splits the progress bar into filled and empty segments.
///
/// `filled = round(elapsed / total * 20)` clamped to `[0, 20]`, so clock drift past
/// the end of the track renders a full bar rather than overflowing. A zero `total_ms`
/// renders an empty bar.
///
/// # Returns
/// - `(filled, empty)` - Always sums to `PROGRESS_SEGMENTS`
pub fn progress_segments(elapsed_ms: u64, total_ms: u64) -> (u32, u32) {
    if total_ms == 0 {
        return (0, PROGRESS_SEGMENTS);
    }

    let ratio = elapsed_ms as f64 / total_ms as f64;
    let filled = (ratio * PROGRESS_SEGMENTS as f64)
        .round()
        .clamp(0.0, PROGRESS_SEGMENTS as f64) as u32;

    (filled, PROGRESS_SEGMENTS - filled)
}

pub fn progress_bar(elapsed_ms: u64, total_ms: u64) -> String {
    let (filled, empty) = progress_segments(elapsed_ms, total_ms);

    std::iter::repeat(FILLED_SEGMENT)
        .take(filled as usize)
        .chain(std::iter::repeat(EMPTY_SEGMENT).take(empty as usize))
        .collect()
}

/// Formats milliseconds as `m:ss`, or `h:mm:ss` from one hour upwards.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Renders the display for a snapshot.
///
/// # Arguments
/// - `guild_id` - Guild the display belongs to, encoded into every control id
/// - `snapshot` - Track and player state to show
/// - `elapsed_ms` - Playback position to show; the ticker passes a freshly computed
///   value, `present()` passes the snapshot's own
///
/// # Returns
/// - `NowPlayingDisplay` - Content plus the three control rows
pub fn render(
    guild_id: GuildId,
    snapshot: &PlaybackSnapshot,
    elapsed_ms: Option<u64>,
) -> NowPlayingDisplay {
    NowPlayingDisplay {
        content: render_content(snapshot, elapsed_ms),
        controls: render_controls(guild_id),
    }
}

fn render_content(snapshot: &PlaybackSnapshot, elapsed_ms: Option<u64>) -> DisplayContent {
    let title = if snapshot.paused {
        "⏸ Paused"
    } else {
        "🎶 Now Playing"
    };

    let duration = if snapshot.is_stream {
        "🔴 LIVE"
    } else {
        snapshot.duration_label.as_str()
    };

    let label = escape_link_text(&truncate_chars(&snapshot.track_title, LABEL_LIMIT));
    let link = (snapshot.track_url.chars().count() <= LINK_URL_LIMIT)
        .then(|| snapshot.track_url.clone());
    let heading = match &link {
        Some(url) => format!("**[{}]({})**", label, url),
        None => format!("**{}**", label),
    };

    let description = truncate_chars(
        &format!(
            "{}\n{} • {} • {}",
            heading,
            truncate_chars(&snapshot.artist, LABEL_LIMIT),
            duration,
            snapshot.source.label()
        ),
        DESCRIPTION_LIMIT,
    );

    let volume = snapshot.volume_percent.min(100);
    let volume_label = if volume == 0 {
        "Muted".to_string()
    } else {
        format!("{}%", volume)
    };

    let mut fields = vec![
        field(
            "Requested by",
            format!("<@{}>", snapshot.requester_id.get()),
            true,
        ),
        field("Volume", volume_label, true),
        field("Loop", snapshot.loop_mode.label(), true),
    ];

    if snapshot.queue_size > 0 {
        let tracks = if snapshot.queue_size == 1 {
            "track"
        } else {
            "tracks"
        };
        fields.push(field(
            "Queue",
            format!(
                "{} {} • {} remaining",
                snapshot.queue_size,
                tracks,
                format_duration(snapshot.queue_estimated_remaining_ms)
            ),
            true,
        ));
    }

    if let Some(next) = &snapshot.next_track_title {
        fields.push(field("Up Next", truncate_chars(next, LABEL_LIMIT), false));
    }

    if let (Some(elapsed), Some(total)) = (elapsed_ms, snapshot.total_ms) {
        if total > 0 {
            fields.push(field(
                "Progress",
                format!(
                    "`{}` {} / {}",
                    progress_bar(elapsed, total),
                    format_duration(elapsed.min(total)),
                    format_duration(total)
                ),
                false,
            ));
        }
    }

    DisplayContent {
        title: title.to_string(),
        url: link,
        description,
        fields,
        thumbnail_url: snapshot.thumbnail_url.clone(),
        color: snapshot.source.color(),
    }
}

/// Builds the three fixed control rows for a guild: transport, queue and volume.
pub fn render_controls(guild_id: GuildId) -> ControlSurface {
    let button = |action, label, emoji, style| ControlButton {
        id: ControlId::new(guild_id, action),
        label,
        emoji,
        style,
        disabled: false,
    };

    ControlSurface {
        rows: vec![
            vec![
                button(ControlAction::Pause, "Pause", '⏸', ControlStyle::Secondary),
                button(ControlAction::Resume, "Resume", '▶', ControlStyle::Success),
                button(ControlAction::Skip, "Skip", '⏭', ControlStyle::Primary),
                button(ControlAction::Stop, "Stop", '⏹', ControlStyle::Danger),
            ],
            vec![
                button(ControlAction::Shuffle, "Shuffle", '🔀', ControlStyle::Secondary),
                button(ControlAction::LoopToggle, "Loop", '🔁', ControlStyle::Secondary),
                button(ControlAction::ViewQueue, "Queue", '📜', ControlStyle::Secondary),
                button(ControlAction::Refresh, "Refresh", '🔄', ControlStyle::Secondary),
            ],
            vec![
                button(ControlAction::VolumeDown, "Vol -", '🔉', ControlStyle::Secondary),
                button(ControlAction::Mute, "Mute", '🔇', ControlStyle::Secondary),
                button(ControlAction::VolumeUp, "Vol +", '🔊', ControlStyle::Secondary),
            ],
        ],
    }
}

fn field(name: &str, value: impl Into<String>, inline: bool) -> DisplayField {
    DisplayField {
        name: name.to_string(),
        value: truncate_chars(&value.into(), FIELD_VALUE_LIMIT),
        inline,
    }
}

/// Cuts `text` to at most `max` characters, ending in `…` when anything was cut.
///
/// Counts `char`s rather than bytes so multi-byte titles are never split mid-character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max.saturating_sub(1)).collect();
    if max > 0 {
        truncated.push('…');
    }
    truncated
}

/// Escapes characters that would end a markdown link label early.
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::snapshot::{LoopMode, TrackSource};
    use serenity::all::UserId;

    fn snapshot() -> PlaybackSnapshot {
        PlaybackSnapshot {
            track_title: "Never Gonna Give You Up".to_string(),
            track_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            artist: "Rick Astley".to_string(),
            duration_label: "3:33".to_string(),
            duration_ms: 213_000,
            source: TrackSource::YouTube,
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg".to_string()),
            requester_id: UserId::new(42),
            volume_percent: 75,
            loop_mode: LoopMode::Queue,
            queue_size: 0,
            queue_estimated_remaining_ms: 0,
            next_track_title: None,
            elapsed_ms: Some(60_000),
            total_ms: Some(213_000),
            paused: false,
            is_stream: false,
        }
    }

    /// Tests progress bar bounds across the interesting positions.
    ///
    /// Expected: filled + empty == 20 and filled within [0, 20] for start, middle,
    /// end and overshoot
    #[test]
    fn progress_segments_stay_in_bounds() {
        let total = 180_000;
        for elapsed in [0, 1, 4_499, 4_500, 90_000, 179_999, 180_000, 180_001, 10_000_000] {
            let (filled, empty) = progress_segments(elapsed, total);
            assert_eq!(filled + empty, PROGRESS_SEGMENTS, "elapsed {elapsed}");
            assert!(filled <= PROGRESS_SEGMENTS, "elapsed {elapsed}");
        }

        assert_eq!(progress_segments(0, total), (0, 20));
        assert_eq!(progress_segments(90_000, total), (10, 10));
        assert_eq!(progress_segments(total, total), (20, 0));
        assert_eq!(progress_segments(total * 3, total), (20, 0));
    }

    /// Tests rounding of partially filled segments.
    ///
    /// Expected: 2.5% rounds up to one segment, 2.4% rounds down to zero
    #[test]
    fn progress_segments_round_to_nearest() {
        assert_eq!(progress_segments(2_500, 100_000), (1, 19));
        assert_eq!(progress_segments(2_400, 100_000), (0, 20));
    }

    /// Tests the bar glyph layout.
    ///
    /// Expected: filled glyphs followed by empty glyphs, 20 characters total
    #[test]
    fn progress_bar_renders_filled_then_empty() {
        let bar = progress_bar(45_000, 180_000);

        assert_eq!(bar.chars().count(), 20);
        assert_eq!(bar, format!("{}{}", "▰".repeat(5), "▱".repeat(15)));
    }

    /// Tests a zero-length total.
    ///
    /// Expected: empty bar without dividing by zero
    #[test]
    fn progress_segments_handle_zero_total() {
        assert_eq!(progress_segments(5_000, 0), (0, 20));
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59_999), "0:59");
        assert_eq!(format_duration(213_000), "3:33");
        assert_eq!(format_duration(3_600_000), "1:00:00");
        assert_eq!(format_duration(3_725_000), "1:02:05");
    }

    /// Tests the always-present parts of the content.
    ///
    /// Expected: linked title, artist line, requester, volume and loop fields
    #[test]
    fn renders_track_details() {
        let display = render(GuildId::new(1), &snapshot(), Some(60_000));
        let content = &display.content;

        assert_eq!(content.title, "🎶 Now Playing");
        assert_eq!(content.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(
            content.description,
            "**[Never Gonna Give You Up](https://youtu.be/dQw4w9WgXcQ)**\nRick Astley • 3:33 • YouTube"
        );
        assert_eq!(content.field("Requested by"), Some("<@42>"));
        assert_eq!(content.field("Volume"), Some("75%"));
        assert_eq!(content.field("Loop"), Some("Queue"));
        assert_eq!(content.color, TrackSource::YouTube.color());
        assert!(content.thumbnail_url.is_some());
    }

    /// Tests that optional sections are omitted when empty.
    ///
    /// Expected: no Queue, Up Next or Progress fields
    #[test]
    fn omits_empty_sections() {
        let snapshot = PlaybackSnapshot {
            total_ms: None,
            ..snapshot()
        };
        let display = render(GuildId::new(1), &snapshot, Some(60_000));

        assert_eq!(display.content.field("Queue"), None);
        assert_eq!(display.content.field("Up Next"), None);
        assert_eq!(display.content.field("Progress"), None);
    }

    /// Tests the optional queue, next-up and progress sections.
    ///
    /// Expected: each field rendered with its summary
    #[test]
    fn renders_queue_next_and_progress() {
        let snapshot = PlaybackSnapshot {
            queue_size: 3,
            queue_estimated_remaining_ms: 600_000,
            next_track_title: Some("Together Forever".to_string()),
            ..snapshot()
        };
        let display = render(GuildId::new(1), &snapshot, Some(106_500));

        assert_eq!(
            display.content.field("Queue"),
            Some("3 tracks • 10:00 remaining")
        );
        assert_eq!(display.content.field("Up Next"), Some("Together Forever"));
        assert_eq!(
            display.content.field("Progress"),
            Some(format!("`{}{}` 1:46 / 3:33", "▰".repeat(10), "▱".repeat(10)).as_str())
        );
    }

    /// Tests the progress label when the clock drifts past the end of the track.
    ///
    /// Expected: full bar and elapsed label capped at the total
    #[test]
    fn caps_progress_label_on_overshoot() {
        let display = render(GuildId::new(1), &snapshot(), Some(500_000));

        assert_eq!(
            display.content.field("Progress"),
            Some(format!("`{}` 3:33 / 3:33", "▰".repeat(20)).as_str())
        );
    }

    /// Tests paused, muted and live-stream rendering.
    ///
    /// Expected: paused title, "Muted" volume and LIVE duration
    #[test]
    fn renders_paused_muted_stream() {
        let snapshot = PlaybackSnapshot {
            paused: true,
            volume_percent: 0,
            is_stream: true,
            source: TrackSource::Twitch,
            ..snapshot()
        };
        let display = render(GuildId::new(1), &snapshot, None);

        assert_eq!(display.content.title, "⏸ Paused");
        assert_eq!(display.content.field("Volume"), Some("Muted"));
        assert!(display.content.description.ends_with("🔴 LIVE • Twitch"));
    }

    /// Tests that brackets in titles cannot break the markdown link.
    ///
    /// Expected: brackets escaped
    #[test]
    fn escapes_brackets_in_title() {
        let snapshot = PlaybackSnapshot {
            track_title: "Song [Official Video]".to_string(),
            ..snapshot()
        };
        let display = render(GuildId::new(1), &snapshot, None);

        assert!(display
            .content
            .description
            .starts_with("**[Song \\[Official Video\\]](https://"));
    }

    /// Tests that oversized track metadata stays within Discord's embed limits.
    ///
    /// Verifies the description, every field value and the embed as a whole after
    /// rendering a title, artist, URL and next-up title far beyond the limits.
    ///
    /// Expected: all limits respected, truncated parts end in an ellipsis
    #[test]
    fn clamps_oversized_metadata_to_embed_limits() {
        let snapshot = PlaybackSnapshot {
            track_title: "T".repeat(4500),
            artist: "A".repeat(3000),
            track_url: format!("https://example.com/{}", "u".repeat(5000)),
            next_track_title: Some("N".repeat(1500)),
            queue_size: 12,
            queue_estimated_remaining_ms: 3_600_000,
            ..snapshot()
        };
        let display = render(GuildId::new(1), &snapshot, Some(60_000));
        let content = &display.content;

        assert!(content.description.chars().count() <= DESCRIPTION_LIMIT);
        for field in &content.fields {
            assert!(
                field.value.chars().count() <= FIELD_VALUE_LIMIT,
                "field {} has {} characters",
                field.name,
                field.value.chars().count()
            );
        }
        assert!(content.text_len() <= EMBED_TEXT_LIMIT);

        assert!(content.description.starts_with(&format!("**{}…**", "T".repeat(255))));
        assert_eq!(content.url, None);
        assert_eq!(
            content.field("Up Next"),
            Some(format!("{}…", "N".repeat(255)).as_str())
        );
    }

    /// Tests character-based truncation.
    ///
    /// Expected: short text untouched, long text cut on a char boundary with an ellipsis
    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_chars("ありがとうございます", 5), "ありがと…");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    /// Tests the control layout and id encoding.
    ///
    /// Expected: rows of 4, 4 and 3 buttons covering every action for the guild
    #[test]
    fn renders_three_control_groups() {
        let guild_id = GuildId::new(987654321);
        let controls = render_controls(guild_id);

        let row_sizes: Vec<usize> = controls.rows.iter().map(Vec::len).collect();
        assert_eq!(row_sizes, vec![4, 4, 3]);

        let actions: Vec<ControlAction> = controls.buttons().map(|b| b.id.action).collect();
        assert_eq!(actions, ControlAction::ALL.to_vec());

        assert!(controls.buttons().all(|b| b.id.guild_id == guild_id));
        assert!(controls.buttons().all(|b| !b.disabled));
    }

    /// Tests the disabled variant used on listener shutdown.
    ///
    /// Expected: same ids, every button disabled
    #[test]
    fn disables_every_control() {
        let controls = render_controls(GuildId::new(1));
        let disabled = controls.clone().disabled();

        assert!(disabled.buttons().all(|b| b.disabled));
        assert!(controls
            .buttons()
            .zip(disabled.buttons())
            .all(|(a, b)| a.id == b.id));
    }
}
