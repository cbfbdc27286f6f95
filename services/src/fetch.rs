use scrobble_status_core::{
    ListeningService,
    ResponseStatus,
    Result,
    TrackEvent,
    UserStats,
};


/// How many events a history request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackLimit(usize);

impl TrackLimit {
    pub const MIN: usize = 1;
    pub const MAX: usize = 10;
    /// Enough for the current and the previous track
    pub const LATEST: Self = Self(2);

    /// Out of range values are clamped rather than rejected
    pub fn clamped(amount: i64) -> Self {
        Self(amount.clamp(Self::MIN as i64, Self::MAX as i64) as usize)
    }

    #[inline]
    pub fn get(self) -> usize { self.0 }
}

impl Default for TrackLimit {
    fn default() -> Self { Self(5) }
}


/// Both halves of a fetch, reconciled into one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Listens {
        events: Vec<TrackEvent>,
        stats: UserStats,
    },
    /// No history. Stats are dropped even when they were found.
    Empty(ResponseStatus),
}

/// Requests recent history and user stats concurrently and waits for both.
///
/// # Errors
///
/// If either request fails the whole fetch fails, partial results are never returned.
pub async fn fetch(service: &dyn ListeningService, username: &str, limit: TrackLimit) -> Result<FetchOutcome> {
    let (activity, stats) = tokio::join!(service.recent_events(username, limit.get()), service.user_stats(username));
    let (mut activity, stats) = (activity?, stats?);

    if activity.is_empty() {
        return Ok(FetchOutcome::Empty(activity.status));
    }

    activity.events.truncate(limit.get());
    Ok(FetchOutcome::Listens {
        events: activity.events,
        stats,
    })
}


#[cfg(test)]
mod tests;
