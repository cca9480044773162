//! Now-playing message data repository for database operations.
//!
//! This module provides the `NowPlayingMessageRepository` for remembering which Discord
//! message currently shows each guild's now-playing display. A guild has at most one
//! record; it is rewritten whenever a new display message is sent and removed once the
//! display is torn down. Records still present at startup belong to displays a previous
//! process never cleaned up.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::model::now_playing_message::{
    NowPlayingMessage, UpsertNowPlayingMessageParam,
};

/// Repository providing database operations for persisted now-playing messages.
pub struct NowPlayingMessageRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NowPlayingMessageRepository<'a> {
    /// Creates a new NowPlayingMessageRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `NowPlayingMessageRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the remembered display message of a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID as a string slice
    ///
    /// # Returns
    /// - `Ok(Some(NowPlayingMessage))` - The guild has a remembered display
    /// - `Ok(None)` - No display is remembered for the guild
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_by_guild_id(&self, guild_id: &str) -> Result<Option<NowPlayingMessage>, DbErr> {
        let entity = entity::prelude::NowPlayingMessage::find()
            .filter(entity::now_playing_message::Column::GuildId.eq(guild_id))
            .one(self.db)
            .await?;

        Ok(entity.map(NowPlayingMessage::from_entity))
    }

    /// Gets every remembered display message, oldest first.
    ///
    /// # Returns
    /// - `Ok(Vec<NowPlayingMessage>)` - All records, possibly empty
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_all(&self) -> Result<Vec<NowPlayingMessage>, DbErr> {
        let entities = entity::prelude::NowPlayingMessage::find()
            .order_by_asc(entity::now_playing_message::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(NowPlayingMessage::from_entity)
            .collect())
    }

    /// Creates or updates the display message of a guild.
    ///
    /// If the guild already has a record, it is pointed at the new channel and message
    /// and `updated_at` is refreshed; otherwise a new record is created.
    ///
    /// # Arguments
    /// - `param` - Guild, channel and message IDs of the new display
    ///
    /// # Returns
    /// - `Ok(NowPlayingMessage)` - The created or updated record
    /// - `Err(DbErr)` - Database error during upsert operation
    pub async fn upsert(
        &self,
        param: UpsertNowPlayingMessageParam,
    ) -> Result<NowPlayingMessage, DbErr> {
        let guild_id = param.guild_id.to_string();
        let existing = self.get_by_guild_id(&guild_id).await?;

        let now = Utc::now();

        let entity = match existing {
            Some(existing) => {
                entity::now_playing_message::ActiveModel {
                    id: ActiveValue::Set(existing.id),
                    guild_id: ActiveValue::Set(existing.guild_id),
                    channel_id: ActiveValue::Set(param.channel_id.to_string()),
                    message_id: ActiveValue::Set(param.message_id.to_string()),
                    created_at: ActiveValue::Set(existing.created_at),
                    updated_at: ActiveValue::Set(now),
                }
                .update(self.db)
                .await?
            }
            None => {
                entity::now_playing_message::ActiveModel {
                    id: ActiveValue::NotSet,
                    guild_id: ActiveValue::Set(guild_id),
                    channel_id: ActiveValue::Set(param.channel_id.to_string()),
                    message_id: ActiveValue::Set(param.message_id.to_string()),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(self.db)
                .await?
            }
        };

        Ok(NowPlayingMessage::from_entity(entity))
    }

    /// Deletes the remembered display message of a guild.
    ///
    /// Deleting a guild without a record is not an error.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID as a string slice
    ///
    /// # Returns
    /// - `Ok(())` - The guild no longer has a record
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete_by_guild_id(&self, guild_id: &str) -> Result<(), DbErr> {
        entity::prelude::NowPlayingMessage::delete_many()
            .filter(entity::now_playing_message::Column::GuildId.eq(guild_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
