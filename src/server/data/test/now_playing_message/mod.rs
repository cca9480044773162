use crate::server::{
    data::now_playing_message::NowPlayingMessageRepository, error::AppError,
    model::now_playing_message::UpsertNowPlayingMessageParam,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory};

mod delete_by_guild_id;
mod get_all;
mod get_by_guild_id;
mod upsert;
