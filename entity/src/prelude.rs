pub use super::now_playing_message::Entity as NowPlayingMessage;
