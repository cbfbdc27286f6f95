//! Turns fetched listens into a reply, text or card, depending on what the invoker prefers

use std::{
    borrow::Cow,
    fmt::Write,
    sync::LazyLock,
};

use regex::Regex;
use scrobble_status_core::{
    Artwork,
    Card,
    CardAuthor,
    CardField,
    DisplayPreference,
    Identity,
    Promotion,
    Reply,
    RequestContext,
    TrackEvent,
    UserStats,
};
use time::OffsetDateTime;

pub const MISSING_PERMISSION: &str =
    "Insufficient permissions, I need to the 'Embed links' permission to show you your scrobbles.";


/// What a reply will look like, picked before anything is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    TextMini,
    TextFull,
    CardMini,
    CardFull,
    /// A card was asked for, but the room does not allow the bot to post one
    MissingPermission,
}

impl DisplayMode {
    pub fn select(preference: DisplayPreference, context: &RequestContext) -> Self {
        match preference {
            DisplayPreference::TextMini => Self::TextMini,
            DisplayPreference::TextFull => Self::TextFull,
            _ if !context.can_send_cards() => Self::MissingPermission,
            DisplayPreference::CardMini => Self::CardMini,
            DisplayPreference::CardFull => Self::CardFull,
        }
    }

    #[inline]
    pub fn is_card(self) -> bool { matches!(self, Self::CardMini | Self::CardFull) }
}


/// Everything a reply is rendered from. Never empty.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    pub identity: &'a Identity,
    pub invoker_title: &'a str,
    pub events: &'a [TrackEvent],
    pub stats: &'a UserStats,
    pub context: &'a RequestContext,
}

impl<'a> Listing<'a> {
    /// `None` when there are no events, there is nothing to show then
    pub fn new(
        identity: &'a Identity,
        invoker_title: &'a str,
        events: &'a [TrackEvent],
        stats: &'a UserStats,
        context: &'a RequestContext,
    ) -> Option<Self> {
        (!events.is_empty()).then_some(Self {
            identity,
            invoker_title,
            events,
            stats,
            context,
        })
    }

    #[inline]
    pub fn current(&self) -> &'a TrackEvent { &self.events[0] }

    #[inline]
    pub fn previous(&self) -> Option<&'a TrackEvent> { self.events.get(1) }

    /// The invoker, or who they asked about
    pub fn title(&self) -> String {
        if self.identity.is_self {
            self.invoker_title.to_owned()
        } else {
            format!("{}, requested by {}", self.identity.resolved_username, self.invoker_title)
        }
    }

    fn profile_url(&self) -> String { self.context.profile_url(&self.identity.resolved_username) }

    fn play_count(&self) -> String { format!("{} has {} scrobbles", self.stats.display_name, self.stats.play_count) }

    fn author(&self, name: String) -> CardAuthor {
        CardAuthor {
            name,
            url: Some(self.profile_url()),
            icon_url: self.context.requester_avatar_url.clone(),
        }
    }

    /// Footer text and timestamp of a card. The timestamp is only set for a finished, dated listen.
    fn footer(&self, now_playing_suffix: Option<&str>) -> (String, Option<OffsetDateTime>) {
        let mut footer = self.play_count();
        let current = self.current();
        if current.is_now_playing() {
            if let Some(suffix) = now_playing_suffix {
                footer.push_str(suffix);
            }
            return (footer, None);
        }
        let played_at = current.played_at();
        if played_at.is_some() {
            footer.push_str(" - Last scrobble:");
        }
        (footer, played_at)
    }
}


/// Renders listings. The promotion is evaluated against `now`.
#[derive(Debug, Clone)]
pub struct Renderer<'p> {
    promotion: Option<&'p Promotion>,
    now: OffsetDateTime,
}

impl<'p> Renderer<'p> {
    pub fn new(promotion: Option<&'p Promotion>, now: OffsetDateTime) -> Self { Self { promotion, now } }

    fn promotion_line(&self, listing: &Listing) -> Option<String> {
        self.promotion
            .and_then(|p| p.render(&listing.identity.resolved_username, self.now))
    }

    /// The current track, and the previous one for the full modes
    pub fn latest(&self, mode: DisplayMode, listing: &Listing, artwork: Option<&Artwork>) -> Reply {
        match mode {
            DisplayMode::TextMini | DisplayMode::TextFull => latest_text(mode == DisplayMode::TextFull, listing),
            DisplayMode::CardMini | DisplayMode::CardFull => {
                Reply::Card(self.latest_card(mode == DisplayMode::CardFull, listing, artwork))
            },
            DisplayMode::MissingPermission => Reply::text(MISSING_PERMISSION),
        }
    }

    fn latest_card(&self, full: bool, listing: &Listing, artwork: Option<&Artwork>) -> Card {
        let header = if listing.current().is_now_playing() {
            "Now playing - "
        } else if full {
            "Last tracks for "
        } else {
            "Last track for "
        };
        let promotion = self.promotion_line(listing);

        let (description, fields) = if full {
            let mut fields = vec![CardField {
                name: "Current:".to_owned(),
                value: linked_track(listing.current()),
            }];
            fields.extend(listing.previous().map(|prev| CardField {
                name: "Previous:".to_owned(),
                value: linked_track(prev),
            }));
            (promotion, fields)
        } else {
            let mut description = linked_track(listing.current());
            if let Some(promo) = promotion {
                let _ = write!(description, "\n{promo}");
            }
            (Some(description), Vec::new())
        };

        let (footer, timestamp) = listing.footer(None);
        Card {
            author: Some(listing.author(format!("{header}{}", listing.title()))),
            url: Some(listing.profile_url()),
            description,
            fields,
            thumbnail_url: artwork.and_then(|a| a.large.clone()),
            footer: Some(footer),
            timestamp,
        }
    }

    /// A numbered list of every event in the listing
    pub fn recent(&self, mode: DisplayMode, listing: &Listing, artwork: Option<&Artwork>) -> Reply {
        match mode {
            DisplayMode::TextMini | DisplayMode::TextFull => recent_text(listing),
            DisplayMode::CardMini | DisplayMode::CardFull => Reply::Card(recent_card(listing, artwork)),
            DisplayMode::MissingPermission => Reply::text(MISSING_PERMISSION),
        }
    }
}

fn latest_text(full: bool, listing: &Listing) -> Reply {
    let header = match (listing.current().is_now_playing(), full) {
        (true, _) => "Now playing - ",
        (false, true) => "Last tracks for ",
        (false, false) => "Last track for ",
    };

    let mut text = format!("{header}{}: \n", listing.title());
    text.push_str(&track_line(listing.current()));
    if full {
        if let Some(prev) = listing.previous() {
            text.push_str(&track_line(prev));
        }
    }
    text.push_str(&listing.play_count());

    Reply::text(filter_mentions(&text))
}

fn recent_text(listing: &Listing) -> Reply {
    let mut text = format!("Latest tracks for {}: \n", listing.title());
    for (i, event) in listing.events.iter().enumerate() {
        let _ = write!(text, "`{}` {}", i + 1, track_line(event));
    }
    text.push_str(&listing.play_count());

    Reply::text(filter_mentions(&text))
}

fn recent_card(listing: &Listing, artwork: Option<&Artwork>) -> Card {
    let mut description = String::new();
    for (i, event) in listing.events.iter().enumerate() {
        let _ = writeln!(description, "`{}` {}", i + 1, linked_track(event));
    }

    let (footer, timestamp) = listing.footer(Some(" - Now Playing"));
    Card {
        author: Some(listing.author(format!("Latest tracks for {}", listing.title()))),
        url: Some(listing.profile_url()),
        description: Some(description),
        fields: Vec::new(),
        thumbnail_url: artwork.and_then(|a| a.medium.clone()),
        footer: Some(footer),
        timestamp,
    }
}


fn album_suffix(event: &TrackEvent) -> String {
    event
        .album
        .as_deref()
        .filter(|a| !a.is_empty())
        .map(|a| format!(" | *{a}*"))
        .unwrap_or_default()
}

/// One line of plain text, no links
pub fn track_line(event: &TrackEvent) -> String {
    format!("**{}** by **{}**{}\n", event.track, event.artist, album_suffix(event))
}

/// Track name linked to its page when there is one, artist and album below
pub fn linked_track(event: &TrackEvent) -> String {
    let name = match &event.url {
        Some(url) => format!("[{}]({url})", event.track),
        None => format!("**{}**", event.track),
    };
    format!("{name}\nBy **{}**{}", event.artist, album_suffix(event))
}

/// Strips sequences that would notify a whole room or role
pub fn filter_mentions(text: &str) -> Cow<'_, str> {
    static MASS_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(?:everyone|here)\b|<@&\d+>").unwrap());
    MASS_MENTION.replace_all(text, "")
}
