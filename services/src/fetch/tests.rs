use scrobble_status_core::ActivityResult;

use super::*;
use crate::mocks::MockService;

fn events(n: usize) -> Vec<TrackEvent> {
    (0..n).map(|i| TrackEvent::played("Lansdowne", format!("Track {i}"), None)).collect()
}

#[test]
fn test_limit_clamps() {
    assert_eq!(TrackLimit::clamped(15).get(), 10);
    assert_eq!(TrackLimit::clamped(10).get(), 10);
    assert_eq!(TrackLimit::clamped(3).get(), 3);
    assert_eq!(TrackLimit::clamped(0).get(), 1);
    assert_eq!(TrackLimit::clamped(-4).get(), 1);
    assert_eq!(TrackLimit::default().get(), 5);
    assert_eq!(TrackLimit::LATEST.get(), 2);
}

#[tokio::test]
async fn test_fetch_requests_both_halves() {
    let service = MockService::new(events(4));
    let outcome = fetch(&service, "zoz", TrackLimit::LATEST).await.unwrap();

    let FetchOutcome::Listens { events, stats } = outcome else {
        panic!("expected listens");
    };
    assert_eq!(events.len(), 2);
    assert_eq!(stats.play_count, 1234);

    let mut calls = service.calls();
    calls.sort();
    assert_eq!(calls, vec!["recent_events zoz 2", "user_stats zoz"]);
}

#[tokio::test]
async fn test_empty_history_discards_stats() {
    let service = MockService::new(Vec::new());
    let outcome = fetch(&service, "zoz", TrackLimit::default()).await.unwrap();
    assert_eq!(outcome, FetchOutcome::Empty(ResponseStatus::Success));
}

#[tokio::test]
async fn test_empty_history_carries_status() {
    let service = MockService::new(Vec::new()).with_activity(ActivityResult::failed(ResponseStatus::NotFound));
    let outcome = fetch(&service, "ghost", TrackLimit::default()).await.unwrap();
    assert_eq!(outcome, FetchOutcome::Empty(ResponseStatus::NotFound));
}

#[tokio::test]
async fn test_either_failure_fails_the_fetch() {
    let service = MockService::new(events(2)).failing_stats();
    assert!(fetch(&service, "zoz", TrackLimit::LATEST).await.is_err());
    // both requests were still issued
    assert_eq!(service.call_count(), 2);

    let service = MockService::new(events(2)).failing_history();
    assert!(fetch(&service, "zoz", TrackLimit::LATEST).await.is_err());
}
