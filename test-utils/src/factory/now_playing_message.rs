//! Now-playing message factory for creating persisted display records.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test now-playing message records.
///
/// IDs default to unique numeric strings so records parse like real Discord IDs.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::now_playing_message::NowPlayingMessageFactory;
///
/// let record = NowPlayingMessageFactory::new(&db)
///     .guild_id("123")
///     .message_id("456")
///     .build()
///     .await?;
/// ```
pub struct NowPlayingMessageFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    message_id: String,
}

impl<'a> NowPlayingMessageFactory<'a> {
    /// Creates a new NowPlayingMessageFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: `"{id}"` where id is auto-incremented
    /// - channel_id: `"{id + 1_000_000}"`
    /// - message_id: `"{id + 2_000_000}"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            guild_id: id.to_string(),
            channel_id: (id + 1_000_000).to_string(),
            message_id: (id + 2_000_000).to_string(),
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Builds and inserts the record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::now_playing_message::Model)` - Created record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::now_playing_message::Model, DbErr> {
        let now = Utc::now();

        entity::now_playing_message::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            message_id: ActiveValue::Set(self.message_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a now-playing message record with default values.
///
/// Shorthand for `NowPlayingMessageFactory::new(db).build().await`.
pub async fn create_now_playing_message(
    db: &DatabaseConnection,
) -> Result<entity::now_playing_message::Model, DbErr> {
    NowPlayingMessageFactory::new(db).build().await
}
