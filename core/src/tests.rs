use time::macros::datetime;

use super::*;

struct RawListen {
    listened_at: Option<i64>,
}

impl ListenData for RawListen {
    fn listened_at(&self) -> Option<i64> { self.listened_at }

    fn track_name(&self) -> &str { "Burn Brighter" }

    fn artist_name(&self) -> &str { "Lansdowne" }

    fn release_name(&self) -> Option<&str> { Some("No Home but the Road") }
}

#[test]
fn test_listen_without_timestamp_is_now_playing() {
    let event = TrackEvent::from_listen(&RawListen { listened_at: None });
    assert!(event.is_now_playing());
    assert_eq!(event.played_at(), None);
    assert_eq!(event.album.as_deref(), Some("No Home but the Road"));
}

#[test]
fn test_listen_with_timestamp() {
    let event = TrackEvent::from_listen(&RawListen {
        listened_at: Some(1_531_090_963),
    });
    assert!(!event.is_now_playing());
    assert_eq!(event.played_at(), Some(datetime!(2018-07-08 23:02:43 UTC)));
}

#[test]
fn test_display_preference_aliases() {
    assert_eq!("textmini".parse(), Ok(DisplayPreference::TextMini));
    assert_eq!("Text-Full".parse(), Ok(DisplayPreference::TextFull));
    assert_eq!("embedmini".parse(), Ok(DisplayPreference::CardMini));
    assert_eq!("card-full".parse(), Ok(DisplayPreference::CardFull));
    assert!("fancy".parse::<DisplayPreference>().is_err());
}

#[test]
fn test_settings_default_display() {
    let settings: UserSettings = serde_json::from_str(r#"{"username": "zoz"}"#).expect("Failed to parse settings");
    assert_eq!(settings.display, DisplayPreference::CardFull);
    assert_eq!(settings.username.as_deref(), Some("zoz"));
}

#[test]
fn test_identity_substitution() {
    let own = Identity::own(7, "zoz");
    assert!(own.is_self);
    assert_eq!(own.resolved_username, "zoz");

    let other = own.substitute("cab");
    assert!(!other.is_self);
    assert_eq!(other.configured_username, "zoz");
    assert_eq!(other.resolved_username, "cab");
}

#[test]
fn test_promotion_expiry_is_inclusive() {
    let promo = Promotion::new("[Your year](https://example.org/{username})", datetime!(2020-01-12 0:00 UTC));
    assert_eq!(
        promo.render("zoz", datetime!(2020-01-12 0:00 UTC)).as_deref(),
        Some("[Your year](https://example.org/zoz)")
    );
    assert_eq!(promo.render("zoz", datetime!(2020-01-12 0:00:01 UTC)), None);
}

#[test]
fn test_card_permission() {
    let mut ctx = RequestContext {
        is_direct_message: false,
        has_embed_permission: false,
        requester_avatar_url: None,
        profile_url_template: "https://listenbrainz.org/user/{username}".to_owned(),
    };
    assert!(!ctx.can_send_cards());
    assert_eq!(ctx.profile_url("zoz"), "https://listenbrainz.org/user/zoz");

    ctx.is_direct_message = true;
    assert!(ctx.can_send_cards());
}
