//! The `latest` and `recent` commands, and the aliases that invoke them

use std::{
    collections::HashMap,
    fmt,
};

use scrobble_status_core::{
    ChatRoom,
    DisplayPreference,
    Identity,
    Invocation,
    ListeningService,
    PreferenceStore,
    Promotion,
    Reply,
    ResponseStatus,
    Result,
};
use time::OffsetDateTime;
use tracing::{
    error,
    info,
};
use uuid::Uuid;

use crate::{
    fetch::{
        fetch,
        FetchOutcome,
        TrackLimit,
    },
    identity::IdentityResolver,
    render::{
        DisplayMode,
        Listing,
        Renderer,
        MISSING_PERMISSION,
    },
};

pub const NOT_CONFIGURED: &str = "Your listening username has not been set. \n\
     Link it with `.fmset 'username' 'card-full/card-mini/text-full/text-mini'` and try again.";
pub const LATEST_USAGE: &str = "Usage: `.fm 'listening username/chat user'` \n\
     You can set your default user and your display mode through the \
     `.fmset 'username' 'card-full/card-mini/text-full/text-mini'` command.";
pub const RECENT_USAGE: &str = "`.fmrecent 'number of items (max 10)' 'listening username/chat user'`";
pub const INVALID_AMOUNT: &str = "Please enter a valid amount. \n\
     `.fmrecent 'number of items (max 10)' 'listening username/chat user'` \n\
     Example: `.fmrecent 8`";
pub const LATEST_FAILED: &str =
    "Unable to show your listening info due to an internal error. Try scrobbling something then use the command again.";
pub const RECENT_FAILED: &str = "Unable to show your recent tracks due to an internal error. \
     Try setting a username with the 'fmset' command, scrobbling something, and then use the command again.";

pub fn no_scrobbles(status: ResponseStatus) -> String {
    format!("No scrobbles found on this profile ({status}). Try scrobbling something and use the command again.")
}

const HELP: &str = "help";
const DEFAULT_AMOUNT: &str = "5";


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Latest,
    Recent,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latest => "latest",
            Self::Recent => "recent",
        })
    }
}

/// A parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `latest [user|help]`
    Latest { user: Option<String> },
    /// `recent [amount] [user|help]`
    Recent { amount: String, user: Option<String> },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Latest { .. } => CommandKind::Latest,
            Self::Recent { .. } => CommandKind::Recent,
        }
    }

    fn user(&self) -> Option<&str> {
        match self {
            Self::Latest { user } | Self::Recent { user, .. } => user.as_deref(),
        }
    }
}


/// Maps every alias a command answers to, built once at startup
#[derive(Debug, Clone)]
pub struct CommandTable {
    aliases: HashMap<&'static str, CommandKind>,
}

impl CommandTable {
    const LATEST: &'static [&'static str] = &[
        "fm", "lastfm", "qm", "wm", "em", "rm", "tm", "ym", "um", "im", "om", "pm", "dm", "gm", "sm", "am", "hm", "jm",
        "km", "lm", "zm", "xm", "cm", "vm", "bm", "nm", "mm",
    ];
    const RECENT: &'static [&'static str] = &["fmrecent", "fmrecenttracks", "fmr"];

    pub fn new() -> Self {
        let latest = Self::LATEST.iter().map(|&a| (a, CommandKind::Latest));
        let recent = Self::RECENT.iter().map(|&a| (a, CommandKind::Recent));
        Self {
            aliases: latest.chain(recent).collect(),
        }
    }

    pub fn lookup(&self, alias: &str) -> Option<CommandKind> {
        self.aliases.get(alias.to_ascii_lowercase().as_str()).copied()
    }

    /// Parses `content` like `.fmrecent 8 some user`. Everything after the known arguments is the user,
    /// kept as written. A lone `help` in place of the amount asks for help.
    pub fn parse(&self, content: &str) -> Option<Command> {
        let content = content.trim_start();
        let (alias, rest) = split_word(content.strip_prefix('.').unwrap_or(content))?;

        Some(match self.lookup(alias)? {
            CommandKind::Latest => Command::Latest { user: remainder(rest) },
            CommandKind::Recent => match split_word(rest) {
                Some((amount, rest)) if !amount.eq_ignore_ascii_case(HELP) => Command::Recent {
                    amount: amount.to_owned(),
                    user: remainder(rest),
                },
                _ => Command::Recent {
                    amount: DEFAULT_AMOUNT.to_owned(),
                    user: remainder(rest),
                },
            },
        })
    }
}

/// The first word of `s` and whatever follows it
fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], s[end..].trim_start()))
}

fn remainder(rest: &str) -> Option<String> {
    let rest = rest.trim_end();
    (!rest.is_empty()).then(|| rest.to_owned())
}

impl Default for CommandTable {
    fn default() -> Self { Self::new() }
}


/// How an invocation ended. Every variant has already sent exactly one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Rendered,
    Help,
    NotConfigured,
    InvalidAmount,
    NoScrobbles(ResponseStatus),
    MissingPermission,
    /// Logged and answered with a generic message
    Failed,
}


/// Runs commands against a listening service and a preference store
pub struct StatusCommands<S, P> {
    service: S,
    preferences: P,
    promotion: Option<Promotion>,
    clock: fn() -> OffsetDateTime,
}

impl<S: ListeningService, P: PreferenceStore> StatusCommands<S, P> {
    pub fn new(service: S, preferences: P) -> Self {
        Self {
            service,
            preferences,
            promotion: None,
            clock: OffsetDateTime::now_utc,
        }
    }

    #[must_use]
    pub fn with_promotion(mut self, promotion: Option<Promotion>) -> Self {
        self.promotion = promotion;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Runs `command` to completion. Failures are logged with the invocation context and answered
    /// with a generic message, nothing about them reaches the room.
    pub async fn run(&self, room: &dyn ChatRoom, invocation: &Invocation, command: &Command) -> CommandOutcome {
        let id = Uuid::new_v4();
        match self.execute(room, invocation, command).await {
            Ok(outcome) => {
                if matches!(outcome, CommandOutcome::Rendered | CommandOutcome::Help) {
                    info!(
                        %id,
                        command = %command.kind(),
                        room_id = ?invocation.room_id,
                        channel_id = invocation.channel_id,
                        invoker_id = invocation.invoker_id,
                        "Command used"
                    );
                }
                outcome
            },
            Err(e) => {
                error!(
                    %id,
                    command = %command.kind(),
                    room_id = ?invocation.room_id,
                    channel_id = invocation.channel_id,
                    invoker_id = invocation.invoker_id,
                    content = %invocation.content,
                    "Command failed: {e:#}"
                );
                let message = match command.kind() {
                    CommandKind::Latest => LATEST_FAILED,
                    CommandKind::Recent => RECENT_FAILED,
                };
                if let Err(e) = room.send(&Reply::text(message)).await {
                    error!(%id, "Failed to report error: {e:#}");
                }
                CommandOutcome::Failed
            },
        }
    }

    async fn execute(&self, room: &dyn ChatRoom, invocation: &Invocation, command: &Command) -> Result<CommandOutcome> {
        let settings = self.preferences.settings(invocation.invoker_id).await?.unwrap_or_default();
        let Some(username) = settings.username.filter(|u| !u.is_empty()) else {
            room.send(&Reply::text(NOT_CONFIGURED)).await?;
            return Ok(CommandOutcome::NotConfigured);
        };

        if command.user().is_some_and(|u| u.eq_ignore_ascii_case(HELP)) {
            let usage = match command.kind() {
                CommandKind::Latest => LATEST_USAGE,
                CommandKind::Recent => RECENT_USAGE,
            };
            room.send(&Reply::text(usage)).await?;
            return Ok(CommandOutcome::Help);
        }

        let limit = match command {
            Command::Latest { .. } => TrackLimit::LATEST,
            Command::Recent { amount, .. } => match amount.trim().parse() {
                Ok(amount) => TrackLimit::clamped(amount),
                Err(_) => {
                    room.send(&Reply::text(INVALID_AMOUNT)).await?;
                    return Ok(CommandOutcome::InvalidAmount);
                },
            },
        };

        let invoker = Identity::own(invocation.invoker_id, username);
        self.show(room, command.kind(), invoker, settings.display, command.user(), limit)
            .await
    }

    async fn show(
        &self,
        room: &dyn ChatRoom,
        kind: CommandKind,
        invoker: Identity,
        display: DisplayPreference,
        token: Option<&str>,
        limit: TrackLimit,
    ) -> Result<CommandOutcome> {
        let identity = IdentityResolver::new(&self.service, &self.preferences)
            .resolve(token, invoker, room)
            .await?;

        let (events, stats) = match fetch(&self.service, &identity.resolved_username, limit).await? {
            FetchOutcome::Listens { events, stats } => (events, stats),
            FetchOutcome::Empty(status) => {
                room.send(&Reply::text(no_scrobbles(status))).await?;
                return Ok(CommandOutcome::NoScrobbles(status));
            },
        };

        let context = room.context();
        let mode = DisplayMode::select(display, context);
        if mode == DisplayMode::MissingPermission {
            room.send(&Reply::text(MISSING_PERMISSION)).await?;
            return Ok(CommandOutcome::MissingPermission);
        }

        let invoker_title = room.invoker_title().await?;
        let Some(listing) = Listing::new(&identity, &invoker_title, &events, &stats, context) else {
            room.send(&Reply::text(no_scrobbles(ResponseStatus::Success))).await?;
            return Ok(CommandOutcome::NoScrobbles(ResponseStatus::Success));
        };

        let artwork = if mode.is_card() {
            self.service.artwork(listing.current()).await?
        } else {
            None
        };

        let renderer = Renderer::new(self.promotion.as_ref(), (self.clock)());
        let reply = match kind {
            CommandKind::Latest => renderer.latest(mode, &listing, artwork.as_ref()),
            CommandKind::Recent => renderer.recent(mode, &listing, artwork.as_ref()),
        };
        room.send(&reply).await?;

        Ok(CommandOutcome::Rendered)
    }
}
