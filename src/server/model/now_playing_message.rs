//! Domain models for persisted now-playing display messages.
//!
//! Defines models for remembering which Discord message currently shows the
//! now-playing display of each guild, so displays left behind by a previous process
//! can be located and removed after a restart.

use chrono::{DateTime, Utc};

use crate::server::{error::AppError, util::parse::parse_u64_from_string};

/// Persisted now-playing display message for a guild.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlayingMessage {
    /// Unique identifier for the record.
    pub id: i32,
    /// Discord guild ID owning the display (stored as String).
    pub guild_id: String,
    /// Discord channel ID the display was posted in (stored as String).
    pub channel_id: String,
    /// Discord message ID of the display (stored as String).
    pub message_id: String,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the record last pointed at a new message.
    pub updated_at: DateTime<Utc>,
}

impl NowPlayingMessage {
    /// Converts an entity model to a now-playing message domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `NowPlayingMessage` - The converted domain model
    pub fn from_entity(entity: entity::now_playing_message::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id,
            channel_id: entity.channel_id,
            message_id: entity.message_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Parses the stored channel and message IDs.
    ///
    /// # Returns
    /// - `Ok((channel_id, message_id))` - Both IDs parsed as u64
    /// - `Err(AppError::InternalErr)` - A stored ID was not a valid u64
    pub fn discord_ids(&self) -> Result<(u64, u64), AppError> {
        let channel_id = parse_u64_from_string(self.channel_id.clone())?;
        let message_id = parse_u64_from_string(self.message_id.clone())?;

        Ok((channel_id, message_id))
    }
}

/// Parameters for upserting the display message of a guild.
///
/// Creates a new record if none exists for the guild, or points the existing record
/// at the new channel and message.
#[derive(Debug, Clone)]
pub struct UpsertNowPlayingMessageParam {
    /// Discord guild ID owning the display.
    pub guild_id: u64,
    /// Discord channel ID the display was posted in.
    pub channel_id: u64,
    /// Discord message ID of the display.
    pub message_id: u64,
}
