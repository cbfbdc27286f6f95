use std::{
    fmt,
    str::FromStr,
};

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    Result,
    UserId,
};


/// How a user wants their listening activity displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayPreference {
    TextMini,
    TextFull,
    CardMini,
    #[default]
    CardFull,
}

impl DisplayPreference {
    #[inline]
    pub fn is_card(self) -> bool { matches!(self, Self::CardMini | Self::CardFull) }

    #[inline]
    pub fn is_full(self) -> bool { matches!(self, Self::TextFull | Self::CardFull) }
}

impl FromStr for DisplayPreference {
    type Err = UnknownDisplayPreference;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text-mini" | "textmini" => Ok(Self::TextMini),
            "text-full" | "textfull" => Ok(Self::TextFull),
            "card-mini" | "cardmini" | "embed-mini" | "embedmini" => Ok(Self::CardMini),
            "card-full" | "cardfull" | "embed-full" | "embedfull" => Ok(Self::CardFull),
            _ => Err(UnknownDisplayPreference(s.to_owned())),
        }
    }
}

impl fmt::Display for DisplayPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TextMini => "text-mini",
            Self::TextFull => "text-full",
            Self::CardMini => "card-mini",
            Self::CardFull => "card-full",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown display mode `{0}`, expected one of text-mini, text-full, card-mini, card-full")]
pub struct UnknownDisplayPreference(String);


/// What a user configured for themselves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Linked listening identity
    pub username: Option<String>,
    #[serde(default)]
    pub display: DisplayPreference,
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// `None` when the user never configured anything
    async fn settings(&self, user: UserId) -> Result<Option<UserSettings>>;
}


/// The listening identity a single invocation reports on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub invoker_id: UserId,
    pub configured_username: String,
    pub resolved_username: String,
    /// `false` when the command asked about someone other than the invoker
    pub is_self: bool,
}

impl Identity {
    pub fn own(invoker_id: UserId, configured_username: impl Into<String>) -> Self {
        let configured_username = configured_username.into();
        Self {
            invoker_id,
            resolved_username: configured_username.clone(),
            configured_username,
            is_self: true,
        }
    }

    #[must_use]
    pub fn substitute(self, username: impl Into<String>) -> Self {
        Self {
            resolved_username: username.into(),
            is_self: false,
            ..self
        }
    }
}
