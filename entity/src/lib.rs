//! SeaORM entities of the now-playing bot.

pub mod prelude;

pub mod now_playing_message;
