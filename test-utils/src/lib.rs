//! Now-Playing Test Utils
//!
//! Provides shared testing utilities for database-backed tests of the now-playing bot.
//! This crate offers a builder pattern for creating test contexts with in-memory SQLite
//! databases and factories for inserting test records.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Record factories with unique default values
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::NowPlayingMessage;
//!
//! #[tokio::test]
//! async fn test_display_records() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(NowPlayingMessage)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.as_ref().unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
