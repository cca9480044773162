//! Self-terminating progress refresh loop of a live display.

use dioxus_logger::tracing;
use serenity::all::{GuildId, MessageId};
use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::{listener::Teardown, render::render, ControllerInner};

/// Owned handle of a running ticker. Dropping it aborts the ticker.
pub struct TickerHandle {
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Drops the handle while letting the task run to completion.
    pub fn release(mut self) {
        self.task.take();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Finished,
}

/// Spawns the ticker for one display message.
///
/// The ticker identifies its session by `epoch` and `message_id`; once either no
/// longer matches, the session belongs to a newer ticker and this one exits without
/// touching it.
pub(super) fn spawn(
    controller: Weak<ControllerInner>,
    guild_id: GuildId,
    epoch: u64,
    message_id: MessageId,
    period: Duration,
) -> TickerHandle {
    let task = tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let Some(controller) = controller.upgrade() else {
                break;
            };

            if tick(&controller, guild_id, epoch, message_id).await == TickOutcome::Finished {
                break;
            }
        }

        tracing::debug!("Progress ticker for guild {} stopped", guild_id);
    });

    TickerHandle { task: Some(task) }
}

async fn tick(
    controller: &ControllerInner,
    guild_id: GuildId,
    epoch: u64,
    message_id: MessageId,
) -> TickOutcome {
    let Some(slot) = controller.registry.existing_slot(guild_id) else {
        return TickOutcome::Finished;
    };
    let mut guard = slot.lock().await;

    let Some(session) = guard.as_mut() else {
        return TickOutcome::Finished;
    };

    if session.epoch != epoch || session.message_id != Some(message_id) {
        return TickOutcome::Finished;
    }

    if !controller.engine.is_active(guild_id) || !session.last_snapshot.needs_progress_refresh()
    {
        tracing::debug!(
            "Playback in guild {} is not advancing, stopping progress updates",
            guild_id
        );
        session.release_ticker();
        return TickOutcome::Finished;
    }

    let display = render(guild_id, &session.last_snapshot, session.elapsed_now());

    match controller
        .chat
        .edit_message(session.channel_id, message_id, &display)
        .await
    {
        Ok(()) => TickOutcome::Continue,
        Err(e) => {
            tracing::warn!(
                "Failed to refresh now-playing display {} in guild {}: {}",
                message_id,
                guild_id,
                e
            );

            session.release_ticker();
            session.message_id = None;

            // A message left in the channel stays recorded for startup recovery
            if e.is_not_found() {
                session.cancel_listener(Teardown::MessageDeleted);
                controller.forget_message(guild_id).await;
            } else {
                session.cancel_listener(Teardown::Retired);
            }

            TickOutcome::Finished
        }
    }
}
