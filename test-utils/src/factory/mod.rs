//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let record = factory::create_now_playing_message(&db).await?;
//!
//! let record = factory::now_playing_message::NowPlayingMessageFactory::new(&db)
//!     .guild_id("123")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `now_playing_message` - Create persisted now-playing display records
//! - `helpers` - Unique ID generation shared by all factories

pub mod helpers;
pub mod now_playing_message;

pub use now_playing_message::create_now_playing_message;
