use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use scrobble_status_services::{
    Promotion,
    RequestContext,
    UserId,
};
use time::{
    format_description::{
        well_known::Rfc3339,
        FormatItem,
    },
    macros::format_description,
    Date,
    OffsetDateTime,
    PrimitiveDateTime,
    UtcOffset,
};


/// Answer a `latest`/`recent` scrobble command the way the chat bot would, printing the reply
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Url of the listenbrainz compatible API to read listens from
    #[arg(short, long, env = "LISTENBRAINZ_URL")]
    pub url: Option<String>,

    /// JSON file listing the members of the room and their settings
    #[arg(short, long, env = "SCROBBLE_STATUS_PREFERENCES")]
    pub preferences: PathBuf,

    /// Member invoking the command
    #[arg(long)]
    pub user_id: UserId,

    /// Room the command is invoked in. Without one the command is treated as a direct message
    #[arg(long)]
    pub room_id: Option<u64>,

    #[arg(long, default_value_t = 0)]
    pub channel_id: u64,

    /// Act as if the bot is not allowed to post cards in the room
    #[arg(long)]
    pub no_embed: bool,

    /// Avatar of the invoker, shown on cards
    #[arg(long)]
    pub avatar_url: Option<String>,

    /// Profile page of a listener, `{username}` is substituted
    #[arg(long, default_value = "https://listenbrainz.org/user/{username}")]
    pub profile_url: String,

    /// Line appended to cards until --promo-expires, `{username}` is substituted
    #[arg(long, requires = "promo_expires")]
    pub promo_message: Option<String>,

    /// When the promotional line stops being shown
    #[arg(long, requires = "promo_message", value_parser = parse_datetime)]
    pub promo_expires: Option<OffsetDateTime>,

    /// The message invoking the command, e.g. `fm` or `.fmrecent 8 bob`
    #[arg(required = true, trailing_var_arg = true)]
    pub invocation: Vec<String>,
}

impl Args {
    pub fn context(&self) -> RequestContext {
        RequestContext {
            is_direct_message: self.room_id.is_none(),
            has_embed_permission: !self.no_embed,
            requester_avatar_url: self.avatar_url.clone(),
            profile_url_template: self.profile_url.clone(),
        }
    }

    pub fn promotion(&self) -> Option<Promotion> {
        self.promo_message
            .as_deref()
            .zip(self.promo_expires)
            .map(|(message, expires_at)| Promotion::new(message, expires_at))
    }

    pub fn content(&self) -> String { self.invocation.join(" ") }
}


/// RFC3339, or a date with an optional time in the local offset
fn parse_datetime(dt: &str) -> Result<OffsetDateTime> {
    const FMTS_DT: &[&[FormatItem]] = &[
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]"),
    ];
    const FMT_DATE: &[FormatItem] = format_description!("[year]-[month]-[day]");

    if let Ok(odt) = OffsetDateTime::parse(dt, &Rfc3339) {
        return Ok(odt);
    }

    let local = FMTS_DT
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(dt, fmt).ok())
        .or_else(|| Date::parse(dt, FMT_DATE).ok().map(Date::midnight))
        .with_context(|| format!("`{dt}` is not a date/time"))?;
    let local_tz = UtcOffset::current_local_offset().context("Could not determine the local offset")?;
    Ok(local.assume_offset(local_tz))
}
