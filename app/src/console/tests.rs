use scrobble_status_services::{
    Card,
    CardAuthor,
};
use time::macros::datetime;

use super::*;

const SAMPLE: &str = r#"[
    {"id": 1, "display_name": "Z", "username": "zoz", "display": "embedmini"},
    {"id": 2, "display_name": "The Cab", "username": "thecab"},
    {"id": "three", "display_name": "Broken"},
    {"id": 4, "display_name": "Lurker"}
]"#;

fn directory() -> Directory { Directory::from_reader(SAMPLE.as_bytes()).expect("Failed to parse preferences") }

fn room(is_direct_message: bool) -> ConsoleRoom {
    ConsoleRoom::new(
        RequestContext {
            is_direct_message,
            has_embed_permission: true,
            requester_avatar_url: None,
            profile_url_template: "https://listenbrainz.org/user/{username}".to_owned(),
        },
        1,
        directory(),
    )
}

#[test]
fn test_load_skips_bad_members() {
    let members = directory().0;
    assert_eq!(members.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2, 4]);
}

#[test]
fn test_invalid_file() {
    assert!(Directory::from_reader(r#"{"id": 1}"#.as_bytes()).is_err());
}

#[tokio::test]
async fn test_settings() {
    let dir = directory();
    assert_eq!(
        dir.settings(1).await.unwrap(),
        Some(UserSettings {
            username: Some("zoz".to_owned()),
            display: DisplayPreference::CardMini,
        })
    );
    assert_eq!(dir.settings(2).await.unwrap().unwrap().display, DisplayPreference::CardFull);
    assert_eq!(dir.settings(4).await.unwrap().unwrap().username, None);
    assert_eq!(dir.settings(99).await.unwrap(), None);
}

#[tokio::test]
async fn test_find_member() {
    let room = room(false);
    assert_eq!(room.find_member("the cab").await.unwrap(), Some(2));
    assert_eq!(room.find_member("<@2>").await.unwrap(), Some(2));
    assert_eq!(room.find_member("<@!4>").await.unwrap(), Some(4));
    assert_eq!(room.find_member("<@99>").await.unwrap(), None);
    assert_eq!(room.find_member("Nobody").await.unwrap(), None);

    assert_eq!(self::room(true).find_member("The Cab").await.unwrap(), None);
}

#[tokio::test]
async fn test_invoker_title() {
    assert_eq!(room(false).invoker_title().await.unwrap(), "Z");

    let stranger = ConsoleRoom::new(room(false).context, 7, directory());
    assert_eq!(stranger.invoker_title().await.unwrap(), "<@7>");
}

#[test]
fn test_format() {
    assert_eq!(ConsoleRoom::format(&Reply::text("hello")).unwrap(), "hello");

    let card = Reply::Card(Card {
        author: Some(CardAuthor {
            name: "Last track for Z".to_owned(),
            url: None,
            icon_url: None,
        }),
        timestamp: Some(datetime!(2022-11-24 19:32:40 UTC)),
        ..Card::default()
    });
    let json: serde_json::Value = serde_json::from_str(&ConsoleRoom::format(&card).unwrap()).unwrap();
    assert_eq!(json["author"]["name"], "Last track for Z");
    assert_eq!(json["timestamp"], "2022-11-24T19:32:40Z");
}
