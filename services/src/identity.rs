use scrobble_status_core::{
    ChatRoom,
    Identity,
    ListeningService,
    PreferenceStore,
    Result,
};
use tracing::debug;


/// Works out which listening identity a command should report on
pub struct IdentityResolver<'a> {
    service: &'a dyn ListeningService,
    preferences: &'a dyn PreferenceStore,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(service: &'a dyn ListeningService, preferences: &'a dyn PreferenceStore) -> Self {
        Self { service, preferences }
    }

    /// Resolves `token` in order of specificity:
    ///
    /// 1. no token: the invoker's own identity
    /// 2. an existing listening identity, used verbatim
    /// 3. a member of the room (not in direct messages) with a linked identity
    /// 4. otherwise the invoker's own identity again
    ///
    /// # Errors
    ///
    /// Fails when the room or the preference store fail. A failed existence probe counts as "not found".
    pub async fn resolve(&self, token: Option<&str>, invoker: Identity, room: &dyn ChatRoom) -> Result<Identity> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(invoker);
        };

        Ok(match self.find_username(token, room).await? {
            Some(username) => invoker.substitute(username),
            None => {
                debug!(token, "No listening identity found, falling back to the invoker");
                invoker
            },
        })
    }

    async fn find_username(&self, token: &str, room: &dyn ChatRoom) -> Result<Option<String>> {
        match self.service.user_exists(token).await {
            Ok(true) => return Ok(Some(token.to_owned())),
            Ok(false) => {},
            Err(e) => debug!(token, "Existence probe failed: {e:#}"),
        }

        if room.context().is_direct_message {
            return Ok(None);
        }

        let Some(member) = room.find_member(token).await? else {
            return Ok(None);
        };
        debug!(token, member, "Resolved room member");

        Ok(self.preferences.settings(member).await?.and_then(|s| s.username).filter(|u| !u.is_empty()))
    }
}
