use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::Result;

pub type UserId = u64;


/// What the chat client tells us about the room a command was invoked in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub is_direct_message: bool,
    /// Whether the bot may post rich cards in this room
    pub has_embed_permission: bool,
    pub requester_avatar_url: Option<String>,
    /// Profile page of a listening identity, `{username}` is substituted
    pub profile_url_template: String,
}

impl RequestContext {
    pub const USERNAME_PLACEHOLDER: &'static str = "{username}";

    pub fn profile_url(&self, username: &str) -> String {
        self.profile_url_template.replace(Self::USERNAME_PLACEHOLDER, username)
    }

    /// Cards can be sent in direct messages, or in rooms that grant the permission
    #[inline]
    pub fn can_send_cards(&self) -> bool { self.is_direct_message || self.has_embed_permission }
}

/// Where a command came from, kept for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub room_id: Option<u64>,
    pub channel_id: u64,
    pub invoker_id: UserId,
    /// The raw message text that triggered the command
    pub content: String,
}


/// A reply, built once per invocation and handed to [`ChatRoom::send`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Text { content: String },
    /// Sent as a single attachment alongside an empty text body
    Card(Card),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self { Self::Text { content: content.into() } }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Card(_) => None,
        }
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Self::Text { .. } => None,
            Self::Card(card) => Some(card),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Card {
    pub author: Option<CardAuthor>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<CardField>,
    pub thumbnail_url: Option<String>,
    pub footer: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
}


/// The chat room a command was invoked in
#[async_trait]
pub trait ChatRoom: Send + Sync {
    fn context(&self) -> &RequestContext;

    /// Looks up a member of this room by display name or mention. Always `None` in direct messages.
    async fn find_member(&self, name: &str) -> Result<Option<UserId>>;

    /// How the invoker is addressed in replies
    async fn invoker_title(&self) -> Result<String>;

    async fn send(&self, reply: &Reply) -> Result<()>;
}
