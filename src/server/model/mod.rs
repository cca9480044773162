//! Server-side domain models and parameter types.
//!
//! This module contains the domain models shared by the display controller, the
//! platform adapters and the data layer. Persisted models are converted from entity
//! models at the repository boundary; playback, control and display models are plain
//! values exchanged with the playback engine and the chat platform.

pub mod control;
pub mod display;
pub mod now_playing_message;
pub mod snapshot;
