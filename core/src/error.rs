use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by one of the collaborators a command talks to
#[derive(Error, Debug)]
pub enum Error {
    /// The listening history service could not answer
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The chat client refused or failed a request
    #[error("Chat error: {0}")]
    Chat(String),

    /// User preferences could not be read
    #[error("Preference store error: {0}")]
    Preferences(String),
}

impl Error {
    pub fn upstream(msg: impl Into<String>) -> Self { Self::Upstream(msg.into()) }

    pub fn chat(msg: impl Into<String>) -> Self { Self::Chat(msg.into()) }

    pub fn preferences(msg: impl Into<String>) -> Self { Self::Preferences(msg.into()) }
}
