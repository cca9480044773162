//! Routes component interactions to the listener of the clicked message.

use serenity::all::MessageId;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::mpsc;

use crate::server::model::control::ControlClick;

/// Per-message fan-out of control clicks.
///
/// The bot's interaction handler calls `dispatch` for every now-playing button click;
/// the click reaches whichever listener most recently subscribed to that message.
/// Cloning the router shares the same subscription table.
#[derive(Clone, Default)]
pub struct ControlRouter {
    subscribers: Arc<Mutex<HashMap<MessageId, mpsc::UnboundedSender<ControlClick>>>>,
}

impl ControlRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for a message, replacing any previous one.
    pub fn subscribe(&self, message_id: MessageId) -> mpsc::UnboundedReceiver<ControlClick> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(message_id, tx);
        rx
    }

    pub fn unsubscribe(&self, message_id: MessageId) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&message_id);
    }

    /// Delivers a click to the listener of `message_id`.
    ///
    /// # Returns
    /// - `Ok(())` - The click was queued for a live listener
    /// - `Err(click)` - No live listener; the caller must answer the interaction itself
    pub fn dispatch(&self, message_id: MessageId, click: ControlClick) -> Result<(), ControlClick> {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(tx) = subscribers.get(&message_id) else {
            return Err(click);
        };

        match tx.send(click) {
            Ok(()) => Ok(()),
            Err(mpsc::error::SendError(click)) => {
                // Listener task has ended without unsubscribing
                subscribers.remove(&message_id);
                Err(click)
            }
        }
    }

    pub fn is_subscribed(&self, message_id: MessageId) -> bool {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&message_id)
    }
}
