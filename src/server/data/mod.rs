//! Database repository layer.
//!
//! Repositories wrap SeaORM entity queries and return domain models, keeping entity
//! types at the infrastructure boundary. The now-playing display only persists which
//! message currently shows each guild's display.

pub mod now_playing_message;

#[cfg(test)]
mod test;
