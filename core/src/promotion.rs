use time::OffsetDateTime;

use crate::RequestContext;


/// A time boxed line appended to cards until it expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// Markdown text, `{username}` is substituted with the resolved listening identity
    pub message: String,
    pub expires_at: OffsetDateTime,
}

impl Promotion {
    pub fn new(message: impl Into<String>, expires_at: OffsetDateTime) -> Self {
        Self {
            message: message.into(),
            expires_at,
        }
    }

    /// Still shown at the exact expiry instant
    #[inline]
    pub fn is_active(&self, now: OffsetDateTime) -> bool { now <= self.expires_at }

    pub fn render(&self, username: &str, now: OffsetDateTime) -> Option<String> {
        self.is_active(now)
            .then(|| self.message.replace(RequestContext::USERNAME_PLACEHOLDER, username))
    }
}
