use std::collections::HashMap;

use serde_json::Value;

pub mod listenbrainz;
pub use self::listenbrainz::ListenBrainzService;


/// First string value found under any of `keys` in a listen's additional info
fn additional_info<'i>(info: &'i HashMap<String, Value>, keys: &[&str]) -> Option<&'i str> {
    keys.iter().find_map(|&k| info.get(k).and_then(Value::as_str)).filter(|v| !v.is_empty())
}
