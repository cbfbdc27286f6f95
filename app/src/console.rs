use std::{
    fs::File,
    io::{
        BufReader,
        Read,
    },
    path::Path,
};

use anyhow::Context;
use async_trait::async_trait;
use scrobble_status_services::{
    de::{
        from_str_opt,
        vec_skip_errors,
    },
    ChatRoom,
    DisplayPreference,
    Error,
    PreferenceStore,
    Reply,
    RequestContext,
    Result,
    UserId,
    UserSettings,
};
use serde::Deserialize;


#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Member {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "from_str_opt")]
    pub display: Option<DisplayPreference>,
}

/// Everyone the console knows about, read from the preferences file
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Directory(#[serde(deserialize_with = "vec_skip_errors")] Vec<Member>);

impl Directory {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| path.display().to_string())?;
        Self::from_reader(BufReader::new(file)).with_context(|| path.display().to_string())
    }

    pub fn from_reader(reader: impl Read) -> anyhow::Result<Self> {
        serde_json::from_reader(reader).context("Invalid preferences file")
    }

    fn get(&self, id: UserId) -> Option<&Member> { self.0.iter().find(|m| m.id == id) }

    /// Accepts a mention (`<@id>`, `<@!id>`) or a display name, ignoring case
    fn lookup(&self, name: &str) -> Option<&Member> {
        let mentioned = name
            .strip_prefix("<@")
            .and_then(|n| n.strip_suffix('>'))
            .map(|n| n.trim_start_matches('!'))
            .and_then(|n| n.parse().ok());

        match mentioned {
            Some(id) => self.get(id),
            None => self.0.iter().find(|m| m.display_name.eq_ignore_ascii_case(name)),
        }
    }
}

#[async_trait]
impl PreferenceStore for Directory {
    async fn settings(&self, user: UserId) -> Result<Option<UserSettings>> {
        Ok(self.get(user).map(|m| UserSettings {
            username: m.username.clone(),
            display: m.display.unwrap_or_default(),
        }))
    }
}


/// A room on the terminal: replies go to stdout, cards as JSON
pub(crate) struct ConsoleRoom {
    context: RequestContext,
    invoker: UserId,
    members: Directory,
}

impl ConsoleRoom {
    pub fn new(context: RequestContext, invoker: UserId, members: Directory) -> Self {
        Self {
            context,
            invoker,
            members,
        }
    }

    fn format(reply: &Reply) -> Result<String> {
        match reply {
            Reply::Text { content } => Ok(content.clone()),
            Reply::Card(card) => serde_json::to_string_pretty(card).map_err(|e| Error::chat(format!("{e:#}"))),
        }
    }
}

#[async_trait]
impl ChatRoom for ConsoleRoom {
    fn context(&self) -> &RequestContext { &self.context }

    async fn find_member(&self, name: &str) -> Result<Option<UserId>> {
        if self.context.is_direct_message {
            return Ok(None);
        }
        Ok(self.members.lookup(name).map(|m| m.id))
    }

    async fn invoker_title(&self) -> Result<String> {
        Ok(self
            .members
            .get(self.invoker)
            .map_or_else(|| format!("<@{}>", self.invoker), |m| m.display_name.clone()))
    }

    async fn send(&self, reply: &Reply) -> Result<()> {
        println!("{}", Self::format(reply)?);
        Ok(())
    }
}


#[cfg(test)]
mod tests;
