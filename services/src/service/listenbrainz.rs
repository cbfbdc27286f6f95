use std::sync::Arc;

use async_trait::async_trait;
use listenbrainz::raw::{
    response::{
        UserListensTrackMetadata,
        UserPlayingNowListen,
    },
    Client,
};
use scrobble_status_core::{
    ActivityResult,
    Artwork,
    Error,
    ListenData,
    ListeningService,
    ResponseStatus,
    Result,
    TrackEvent,
    UserStats,
};
use serde::Deserialize;
use tracing::debug;

use super::additional_info;

const COVER_ART_ARCHIVE: &str = "https://coverartarchive.org/release";
const ORIGIN_URL_KEYS: &[&str] = &["origin_url", "spotify_id"];
const RELEASE_MBID_KEYS: &[&str] = &["release_mbid"];


/// Body of `user/{name}/listens`. The client's own response type drops `mbid_mapping`, so listens are read
/// through these instead.
#[derive(Debug, Deserialize)]
struct ListensResponse {
    payload: ListensPayload,
}

#[derive(Debug, Deserialize)]
struct ListensPayload {
    listens: Vec<Listen>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Listen {
    listened_at: i64,
    track_metadata: TrackMetadata,
}

#[derive(Debug, Deserialize)]
struct TrackMetadata {
    #[serde(flatten)]
    data: UserListensTrackMetadata,
    #[serde(default)]
    mbid_mapping: Option<MbidMapping>,
}

#[derive(Debug, Deserialize)]
struct MbidMapping {
    #[serde(default)]
    release_mbid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: u16,
    error: String,
}


/// A finished listen from a user's history
pub(crate) struct Recorded<'l>(pub &'l Listen);

impl ListenData for Recorded<'_> {
    fn listened_at(&self) -> Option<i64> { Some(self.0.listened_at) }

    fn track_name(&self) -> &str { self.0.track_metadata.data.track_name.as_str() }

    fn artist_name(&self) -> &str { self.0.track_metadata.data.artist_name.as_str() }

    fn release_name(&self) -> Option<&str> { self.0.track_metadata.data.release_name.as_deref() }

    fn origin_url(&self) -> Option<&str> {
        additional_info(&self.0.track_metadata.data.additional_info, ORIGIN_URL_KEYS)
    }

    /// The mapped release first, then whatever the submitting client sent along
    fn release_mbid(&self) -> Option<&str> {
        let meta = &self.0.track_metadata;
        meta.mbid_mapping
            .as_ref()
            .and_then(|m| m.release_mbid.as_deref())
            .filter(|m| !m.is_empty())
            .or_else(|| additional_info(&meta.data.additional_info, RELEASE_MBID_KEYS))
    }
}

/// The listen a user is in the middle of
pub(crate) struct Playing<'l>(pub &'l UserPlayingNowListen);

impl ListenData for Playing<'_> {
    fn listened_at(&self) -> Option<i64> { None }

    fn track_name(&self) -> &str { self.0.track_metadata.track_name.as_str() }

    fn artist_name(&self) -> &str { self.0.track_metadata.artist_name.as_str() }

    fn release_name(&self) -> Option<&str> { self.0.track_metadata.release_name.as_deref() }

    fn origin_url(&self) -> Option<&str> { additional_info(&self.0.track_metadata.additional_info, ORIGIN_URL_KEYS) }

    fn release_mbid(&self) -> Option<&str> {
        additional_info(&self.0.track_metadata.additional_info, RELEASE_MBID_KEYS)
    }
}


/// Cover Art Archive links for the release an event belongs to
pub fn cover_art(release_mbid: &str) -> Artwork {
    let size = |px: u16| Some(format!("{COVER_ART_ARCHIVE}/{release_mbid}/front-{px}"));
    Artwork {
        small: size(250),
        medium: size(500),
        large: size(1200),
    }
}


/// Listening history from a ListenBrainz compatible API
#[derive(Clone)]
pub struct ListenBrainzService {
    client: Arc<Client>,
}

impl ListenBrainzService {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: Arc::new(url.map(Client::new_with_url).unwrap_or_else(Client::new)),
        }
    }

    /// The client blocks, so every request gets its own blocking task
    async fn call<T, F>(&self, request: F) -> Result<std::result::Result<T, listenbrainz::Error>>
    where
        T: Send + 'static,
        F: FnOnce(&Client) -> std::result::Result<T, listenbrainz::Error> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || request(&client))
            .await
            .map_err(|e| Error::upstream(format!("request task failed: {e}")))
    }
}

/// `user/{name}/listens`, requested directly so the mapped MusicBrainz ids survive
fn user_listens(client: &Client, username: &str, count: usize) -> std::result::Result<ListensResponse, listenbrainz::Error> {
    let response = attohttpc::get(format!("{}user/{username}/listens", client.api_url()))
        .param("count", count)
        .send()
        .map_err(listenbrainz::Error::Http)?;

    if !response.status().is_success() {
        let ApiError { code, error } = response.json().map_err(listenbrainz::Error::Json)?;
        return Err(listenbrainz::Error::Api { code, error });
    }
    response.json().map_err(listenbrainz::Error::Json)
}

/// Sorts API errors into "answered, but no data" and real failures
fn response_status(err: listenbrainz::Error) -> Result<ResponseStatus> {
    match err {
        listenbrainz::Error::Api { code: 404, .. } => Ok(ResponseStatus::NotFound),
        listenbrainz::Error::Api { code, error } => {
            debug!(code, "API refused request: {error}");
            Ok(ResponseStatus::Failure)
        },
        e => Err(Error::upstream(format!("{e:#}"))),
    }
}

#[async_trait]
impl ListeningService for ListenBrainzService {
    async fn recent_events(&self, username: &str, limit: usize) -> Result<ActivityResult> {
        let user = username.to_owned();
        let playing = self.call(move |c| c.user_playing_now(&user));
        let user = username.to_owned();
        let listens = self.call(move |c| user_listens(c, &user, limit));
        let (playing, listens) = tokio::join!(playing, listens);

        let listens = match listens? {
            Ok(resp) => resp.payload.listens,
            Err(e) => return response_status(e).map(ActivityResult::failed),
        };
        let playing = match playing? {
            Ok(resp) => resp.payload.listens,
            Err(e) => {
                debug!(username, "No playing now listen: {e:#}");
                Vec::new()
            },
        };

        let events = playing
            .iter()
            .map(|l| TrackEvent::from_listen(&Playing(l)))
            .chain(listens.iter().map(|l| TrackEvent::from_listen(&Recorded(l))))
            .take(limit)
            .collect();
        Ok(ActivityResult::success(events))
    }

    /// A listener the service does not know about has no plays, rather than failing the request
    async fn user_stats(&self, username: &str) -> Result<UserStats> {
        let user = username.to_owned();
        let play_count = match self.call(move |c| c.user_listen_count(&user)).await? {
            Ok(resp) => resp.payload.count,
            Err(e) => {
                let status = response_status(e)?;
                debug!(username, %status, "No listen count");
                0
            },
        };

        Ok(UserStats {
            display_name: username.to_owned(),
            play_count,
        })
    }

    async fn user_exists(&self, username: &str) -> Result<bool> {
        let user = username.to_owned();
        Ok(self.call(move |c| c.user_listen_count(&user)).await?.is_ok())
    }

    async fn artwork(&self, event: &TrackEvent) -> Result<Option<Artwork>> {
        Ok(event.release_mbid.as_deref().map(cover_art))
    }
}
