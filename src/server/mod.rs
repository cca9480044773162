//! Now-playing display half of a Discord music bot.
//!
//! The playback engine producing snapshots and consuming control actions lives
//! outside this crate. This crate keeps one live display message per guild in sync
//! with it and routes the display's button clicks back.
//!
//! # Architecture
//!
//! - **Service Layer** (`service/`) - The display controller and the chat and playback seams
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Snapshots, controls and rendered display values
//! - **Error Layer** (`error/`) - Application and component error types
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **Startup** (`startup`) - Database connection and migrations
//! - **Scheduler** (`scheduler/`) - Cron sweep of displays whose playback has ended
//! - **Bot** (`bot/`) - Discord gateway client routing component interactions

pub mod bot;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
