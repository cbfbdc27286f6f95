//! Recording fakes of the collaborators, for unit tests

use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};

use async_trait::async_trait;
use scrobble_status_core::{
    ActivityResult,
    Artwork,
    ChatRoom,
    DisplayPreference,
    Error,
    ListeningService,
    PreferenceStore,
    Reply,
    RequestContext,
    Result,
    TrackEvent,
    UserId,
    UserSettings,
    UserStats,
};

// ── MockService ───────────────────────────────────────────────────────────────

/// Answers from canned data and records every call as `"<method> <username>"`
#[derive(Clone)]
pub struct MockService {
    activity: ActivityResult,
    stats: UserStats,
    existing: Vec<String>,
    artwork: Option<Artwork>,
    fail_history: bool,
    fail_stats: bool,
    fail_probe: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self {
            activity: ActivityResult::success(events),
            stats: UserStats {
                display_name: "zoz".to_owned(),
                play_count: 1234,
            },
            existing: Vec::new(),
            artwork: None,
            fail_history: false,
            fail_stats: false,
            fail_probe: false,
            calls: Arc::default(),
        }
    }

    pub fn with_activity(mut self, activity: ActivityResult) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_existing(mut self, username: &str) -> Self {
        self.existing.push(username.to_owned());
        self
    }

    pub fn with_artwork(mut self, artwork: Artwork) -> Self {
        self.artwork = Some(artwork);
        self
    }

    pub fn failing_history(mut self) -> Self {
        self.fail_history = true;
        self
    }

    pub fn failing_stats(mut self) -> Self {
        self.fail_stats = true;
        self
    }

    pub fn failing_probe(mut self) -> Self {
        self.fail_probe = true;
        self
    }

    pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    pub fn call_count(&self) -> usize { self.calls.lock().unwrap().len() }

    fn record(&self, call: String) { self.calls.lock().unwrap().push(call); }
}

#[async_trait]
impl ListeningService for MockService {
    async fn recent_events(&self, username: &str, limit: usize) -> Result<ActivityResult> {
        self.record(format!("recent_events {username} {limit}"));
        if self.fail_history {
            return Err(Error::upstream("history unavailable"));
        }
        let mut activity = self.activity.clone();
        activity.events.truncate(limit);
        Ok(activity)
    }

    async fn user_stats(&self, username: &str) -> Result<UserStats> {
        self.record(format!("user_stats {username}"));
        if self.fail_stats {
            return Err(Error::upstream("stats unavailable"));
        }
        Ok(self.stats.clone())
    }

    async fn user_exists(&self, username: &str) -> Result<bool> {
        self.record(format!("user_exists {username}"));
        if self.fail_probe {
            return Err(Error::upstream("probe timed out"));
        }
        Ok(self.existing.iter().any(|u| u == username))
    }

    async fn artwork(&self, event: &TrackEvent) -> Result<Option<Artwork>> {
        self.record(format!("artwork {}", event.artist));
        Ok(self.artwork.clone())
    }
}

// ── MockRoom ──────────────────────────────────────────────────────────────────

/// A room with a fixed member list that keeps every reply sent to it
#[derive(Clone)]
pub struct MockRoom {
    context: RequestContext,
    members: HashMap<String, UserId>,
    title: String,
    fail_send: bool,
    sent: Arc<Mutex<Vec<Reply>>>,
}

impl MockRoom {
    pub fn new() -> Self {
        Self {
            context: RequestContext {
                is_direct_message: false,
                has_embed_permission: true,
                requester_avatar_url: Some("https://cdn.example.org/avatar.png".to_owned()),
                profile_url_template: "https://listenbrainz.org/user/{username}".to_owned(),
            },
            members: HashMap::new(),
            title: "Z".to_owned(),
            fail_send: false,
            sent: Arc::default(),
        }
    }

    pub fn direct_message(mut self) -> Self {
        self.context.is_direct_message = true;
        self
    }

    pub fn without_embed_permission(mut self) -> Self {
        self.context.has_embed_permission = false;
        self
    }

    pub fn with_member(mut self, name: &str, id: UserId) -> Self {
        self.members.insert(name.to_owned(), id);
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn sent(&self) -> Vec<Reply> { self.sent.lock().unwrap().clone() }

    /// The only reply sent, panics if there is not exactly one
    pub fn reply(&self) -> Reply {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one reply, got {sent:#?}");
        sent.into_iter().next().unwrap()
    }
}

#[async_trait]
impl ChatRoom for MockRoom {
    fn context(&self) -> &RequestContext { &self.context }

    async fn find_member(&self, name: &str) -> Result<Option<UserId>> {
        if self.context.is_direct_message {
            return Ok(None);
        }
        Ok(self.members.get(name).copied())
    }

    async fn invoker_title(&self) -> Result<String> { Ok(self.title.clone()) }

    async fn send(&self, reply: &Reply) -> Result<()> {
        if self.fail_send {
            return Err(Error::chat("Missing access"));
        }
        self.sent.lock().unwrap().push(reply.clone());
        Ok(())
    }
}

// ── MockPreferences ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPreferences {
    users: HashMap<UserId, UserSettings>,
}

impl MockPreferences {
    pub fn with_user(mut self, id: UserId, username: Option<&str>, display: DisplayPreference) -> Self {
        self.users.insert(id, UserSettings {
            username: username.map(str::to_owned),
            display,
        });
        self
    }
}

#[async_trait]
impl PreferenceStore for MockPreferences {
    async fn settings(&self, user: UserId) -> Result<Option<UserSettings>> { Ok(self.users.get(&user).cloned()) }
}
