use std::fmt;

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};
use time::OffsetDateTime;

use crate::Result;


/// Anything that describes a single listen, finished or still in progress
pub trait ListenData {
    /// Unix timestamp of when the listen was recorded. `None` while it is still playing.
    fn listened_at(&self) -> Option<i64>;

    fn track_name(&self) -> &str;
    fn artist_name(&self) -> &str;

    fn release_name(&self) -> Option<&str> { None }

    /// Link to the track on the service it was played from
    fn origin_url(&self) -> Option<&str> { None }

    /// MusicBrainz id of the release, used to look up artwork
    fn release_mbid(&self) -> Option<&str> { None }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    NowPlaying,
    /// A finished listen. The upstream service does not always report when.
    Played(Option<OffsetDateTime>),
}

/// One scrobble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEvent {
    pub artist: String,
    pub album: Option<String>,
    pub track: String,
    pub url: Option<String>,
    pub release_mbid: Option<String>,
    pub state: PlayState,
}

impl TrackEvent {
    pub fn now_playing(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: None,
            track: track.into(),
            url: None,
            release_mbid: None,
            state: PlayState::NowPlaying,
        }
    }

    pub fn played(artist: impl Into<String>, track: impl Into<String>, at: Option<OffsetDateTime>) -> Self {
        Self {
            state: PlayState::Played(at),
            ..Self::now_playing(artist, track)
        }
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builds an event from any listen. A listen without a timestamp is considered to be playing now.
    pub fn from_listen<L: ListenData + ?Sized>(listen: &L) -> Self {
        Self {
            artist: listen.artist_name().to_owned(),
            album: listen.release_name().map(str::to_owned),
            track: listen.track_name().to_owned(),
            url: listen.origin_url().map(str::to_owned),
            release_mbid: listen.release_mbid().map(str::to_owned),
            state: match listen.listened_at() {
                None => PlayState::NowPlaying,
                Some(ts) => PlayState::Played(OffsetDateTime::from_unix_timestamp(ts).ok()),
            },
        }
    }

    #[inline]
    pub fn is_now_playing(&self) -> bool { matches!(self.state, PlayState::NowPlaying) }

    #[inline]
    pub fn played_at(&self) -> Option<OffsetDateTime> {
        match self.state {
            PlayState::NowPlaying => None,
            PlayState::Played(at) => at,
        }
    }
}

/// How the upstream service answered a history request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    /// The listening identity does not exist
    NotFound,
    /// The service answered, but with an error of its own
    Failure,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::NotFound => "user not found",
            Self::Failure => "service failure",
        })
    }
}

/// Recent history of a listening identity, most recent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityResult {
    pub status: ResponseStatus,
    pub events: Vec<TrackEvent>,
}

impl ActivityResult {
    pub fn success(events: Vec<TrackEvent>) -> Self {
        Self {
            status: ResponseStatus::Success,
            events,
        }
    }

    pub fn failed(status: ResponseStatus) -> Self { Self { status, events: Vec::new() } }

    #[inline]
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub display_name: String,
    pub play_count: u64,
}

/// Cover art in the sizes the upstream service offers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}


/// The upstream listening history service. All calls are read only.
#[async_trait]
pub trait ListeningService: Send + Sync {
    /// Up to `limit` most recent events, an in-progress listen first when there is one
    async fn recent_events(&self, username: &str, limit: usize) -> Result<ActivityResult>;

    async fn user_stats(&self, username: &str) -> Result<UserStats>;

    async fn user_exists(&self, username: &str) -> Result<bool>;

    async fn artwork(&self, event: &TrackEvent) -> Result<Option<Artwork>>;
}
