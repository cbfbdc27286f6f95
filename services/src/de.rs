use std::{
    fmt::Display,
    marker::PhantomData,
    str::FromStr,
};

use serde::{
    de::{
        DeserializeOwned,
        Error,
        SeqAccess,
        Visitor,
    },
    Deserialize,
};
use serde_json::Value;
use tracing::warn;


/// Deserializes an optional [`FromStr`] type from a string, so lenient parsers like
/// [`DisplayPreference`](crate::DisplayPreference)'s aliases apply to files too
pub fn from_str_opt<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    Option::<String>::deserialize(de)?.map(|v| v.parse().map_err(Error::custom)).transpose()
}

struct GoodVisitor<T>(PhantomData<T>);
impl<'de, T: DeserializeOwned> Visitor<'de> for GoodVisitor<T> {
    type Value = Vec<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result { formatter.write_str("a sequence") }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        // Each element is read whole first, so a bad one cannot derail the rest of the sequence
        while let Some(raw) = seq.next_element::<Value>()? {
            match T::deserialize(raw) {
                Ok(value) => values.push(value),
                Err(e) => warn!("Skipping entry: {e:#}"),
            }
        }
        Ok(values)
    }
}

/// Deserializes a sequence, skipping (and logging) the elements that fail to deserialize
pub fn vec_skip_errors<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    de.deserialize_seq(GoodVisitor(PhantomData))
}
