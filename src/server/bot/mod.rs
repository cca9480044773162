//! Discord bot runtime delivering control clicks to the now-playing displays.
//!
//! The bot owns the gateway connection. Display messages themselves are sent and
//! edited over the shared HTTP client, so the gateway is only needed for component
//! interactions, which Discord delivers regardless of intents. The bot's HTTP client
//! is shared with the display controller so all Discord calls go through one rate
//! limiter.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Receive guild availability events
//! - `GUILD_MESSAGES` - Receive events about messages in guild channels

pub mod handler;
pub mod start;
