use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NowPlayingMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(NowPlayingMessage::Id))
                    .col(string(NowPlayingMessage::GuildId))
                    .col(string(NowPlayingMessage::ChannelId))
                    .col(string(NowPlayingMessage::MessageId))
                    .col(timestamp(NowPlayingMessage::CreatedAt))
                    .col(timestamp(NowPlayingMessage::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // One display per guild
        manager
            .create_index(
                Index::create()
                    .name("idx_now_playing_message_guild_id")
                    .table(NowPlayingMessage::Table)
                    .col(NowPlayingMessage::GuildId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_now_playing_message_guild_id")
                    .table(NowPlayingMessage::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(NowPlayingMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NowPlayingMessage {
    Table,
    Id,
    GuildId,
    ChannelId,
    MessageId,
    CreatedAt,
    UpdatedAt,
}
