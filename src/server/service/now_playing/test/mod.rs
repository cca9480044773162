use serenity::{
    all::{ChannelId, GuildId, MessageId, UserId},
    async_trait,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc;

use crate::server::{
    config::DisplayConfig,
    error::{chat::ChatError, now_playing::NowPlayingError, playback::PlaybackError},
    model::{
        control::{ControlAction, ControlClick, ControlId, ControlReply},
        display::{ControlSurface, NowPlayingDisplay},
        snapshot::{LoopMode, PlaybackSnapshot, TrackSource},
    },
    service::{
        chat::{ChatClient, ControlRouter},
        now_playing::NowPlayingController,
        playback::{ActionResult, PlaybackEngine},
    },
};


const GUILD: GuildId = GuildId::new(100);
const CHANNEL: ChannelId = ChannelId::new(200);
const OTHER_CHANNEL: ChannelId = ChannelId::new(201);

#[derive(Default)]
struct ChatState {
    next_id: u64,
    /// Message IDs per channel in posting order, oldest first.
    history: HashMap<ChannelId, Vec<MessageId>>,
    sent: Vec<(ChannelId, MessageId)>,
    edits: Vec<(ChannelId, MessageId, NowPlayingDisplay)>,
    control_edits: Vec<(ChannelId, MessageId, ControlSurface)>,
    deleted: Vec<(ChannelId, MessageId)>,
    send_failure: Option<ChatError>,
    edit_failure: Option<ChatError>,
    delete_failure: Option<ChatError>,
    fetch_failure: Option<ChatError>,
}

impl ChatState {
    fn post(&mut self, channel_id: ChannelId) -> MessageId {
        self.next_id += 1;
        let message_id = MessageId::new(1_000 + self.next_id);
        self.history.entry(channel_id).or_default().push(message_id);
        message_id
    }

    fn exists(&self, channel_id: ChannelId, message_id: MessageId) -> bool {
        self.history
            .get(&channel_id)
            .is_some_and(|messages| messages.contains(&message_id))
    }
}

/// In-memory chat platform recording every call.
#[derive(Default)]
pub struct FakeChat {
    state: Mutex<ChatState>,
    router: ControlRouter,
}

impl FakeChat {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ChatState> {
        self.state.lock().unwrap()
    }

    /// Posts a message by someone else, pushing the display up the channel.
    fn post_other(&self, channel_id: ChannelId) -> MessageId {
        self.state().post(channel_id)
    }

    /// Deletes a message behind the bot's back.
    fn remove_externally(&self, channel_id: ChannelId, message_id: MessageId) {
        if let Some(messages) = self.state().history.get_mut(&channel_id) {
            messages.retain(|id| *id != message_id);
        }
    }

    fn sent(&self) -> Vec<(ChannelId, MessageId)> {
        self.state().sent.clone()
    }

    fn edits(&self) -> Vec<(ChannelId, MessageId, NowPlayingDisplay)> {
        self.state().edits.clone()
    }

    fn control_edits(&self) -> Vec<(ChannelId, MessageId, ControlSurface)> {
        self.state().control_edits.clone()
    }

    fn deleted(&self) -> Vec<(ChannelId, MessageId)> {
        self.state().deleted.clone()
    }

    fn live_messages(&self, channel_id: ChannelId) -> Vec<MessageId> {
        let state = self.state();
        state
            .sent
            .iter()
            .filter(|(channel, message)| *channel == channel_id && state.exists(*channel, *message))
            .map(|(_, message)| *message)
            .collect()
    }

    fn fail_sends(&self, error: Option<ChatError>) {
        self.state().send_failure = error;
    }

    fn fail_edits(&self, error: Option<ChatError>) {
        self.state().edit_failure = error;
    }

    fn fail_deletes(&self, error: Option<ChatError>) {
        self.state().delete_failure = error;
    }

    fn fail_fetches(&self, error: Option<ChatError>) {
        self.state().fetch_failure = error;
    }

    fn router(&self) -> &ControlRouter {
        &self.router
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        _display: &NowPlayingDisplay,
    ) -> Result<MessageId, ChatError> {
        let mut state = self.state();
        if let Some(error) = state.send_failure.clone() {
            return Err(error);
        }

        let message_id = state.post(channel_id);
        state.sent.push((channel_id, message_id));
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        display: &NowPlayingDisplay,
    ) -> Result<(), ChatError> {
        let mut state = self.state();
        if let Some(error) = state.edit_failure.clone() {
            return Err(error);
        }
        if !state.exists(channel_id, message_id) {
            return Err(ChatError::NotFound);
        }

        state.edits.push((channel_id, message_id, display.clone()));
        Ok(())
    }

    async fn edit_controls(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        controls: &ControlSurface,
    ) -> Result<(), ChatError> {
        let mut state = self.state();
        if !state.exists(channel_id, message_id) {
            return Err(ChatError::NotFound);
        }

        state
            .control_edits
            .push((channel_id, message_id, controls.clone()));
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ChatError> {
        let mut state = self.state();
        if let Some(error) = state.delete_failure.clone() {
            return Err(error);
        }
        if !state.exists(channel_id, message_id) {
            return Err(ChatError::NotFound);
        }

        if let Some(messages) = state.history.get_mut(&channel_id) {
            messages.retain(|id| *id != message_id);
        }
        state.deleted.push((channel_id, message_id));
        Ok(())
    }

    async fn fetch_recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
    ) -> Result<Vec<MessageId>, ChatError> {
        let state = self.state();
        if let Some(error) = state.fetch_failure.clone() {
            return Err(error);
        }

        Ok(state
            .history
            .get(&channel_id)
            .map(|messages| {
                messages
                    .iter()
                    .rev()
                    .take(usize::from(limit))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn subscribe_controls(&self, message_id: MessageId) -> mpsc::UnboundedReceiver<ControlClick> {
        self.router.subscribe(message_id)
    }

    fn unsubscribe_controls(&self, message_id: MessageId) {
        self.router.unsubscribe(message_id);
    }
}

/// Playback engine with a settable active set and a fixed answer.
pub struct FakeEngine {
    active: Mutex<HashSet<GuildId>>,
    applied: Mutex<Vec<(GuildId, ControlAction)>>,
    answer: Mutex<ActionResult>,
}

impl FakeEngine {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            active: Mutex::new(HashSet::from([GUILD])),
            applied: Mutex::new(Vec::new()),
            answer: Mutex::new(Ok(None)),
        })
    }

    fn set_active(&self, guild_id: GuildId, active: bool) {
        let mut guilds = self.active.lock().unwrap();
        if active {
            guilds.insert(guild_id);
        } else {
            guilds.remove(&guild_id);
        }
    }

    fn answer_with(&self, answer: ActionResult) {
        *self.answer.lock().unwrap() = answer;
    }

    fn applied(&self) -> Vec<(GuildId, ControlAction)> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaybackEngine for FakeEngine {
    fn is_active(&self, guild_id: GuildId) -> bool {
        self.active.lock().unwrap().contains(&guild_id)
    }

    async fn apply(&self, guild_id: GuildId, action: ControlAction) -> ActionResult {
        self.applied.lock().unwrap().push((guild_id, action));
        self.answer.lock().unwrap().clone()
    }
}

fn snapshot(title: &str) -> PlaybackSnapshot {
    PlaybackSnapshot {
        track_title: title.to_string(),
        track_url: format!("https://example.com/{}", title),
        artist: "Artist".to_string(),
        duration_label: "3:00".to_string(),
        duration_ms: 180_000,
        source: TrackSource::YouTube,
        thumbnail_url: None,
        requester_id: UserId::new(7),
        volume_percent: 80,
        loop_mode: LoopMode::Off,
        queue_size: 2,
        queue_estimated_remaining_ms: 400_000,
        next_track_title: Some("Next".to_string()),
        elapsed_ms: Some(0),
        total_ms: Some(180_000),
        paused: false,
        is_stream: false,
    }
}

fn controller(chat: &Arc<FakeChat>, engine: &Arc<FakeEngine>) -> NowPlayingController {
    NowPlayingController::new(chat.clone(), engine.clone(), DisplayConfig::default(), None)
}

/// Lets spawned listeners and tickers run until they wait again.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Clicks a control on a display and waits for the reply.
async fn click(chat: &FakeChat, message_id: MessageId, custom_id: String) -> Option<ControlReply> {
    let (click, reply) = ControlClick::new(custom_id, UserId::new(9));
    chat.router().dispatch(message_id, click).ok()?;
    reply.await.ok()
}

fn control(guild_id: GuildId, action: ControlAction) -> String {
    ControlId::new(guild_id, action).encode()
}
