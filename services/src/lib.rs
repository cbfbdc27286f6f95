pub use scrobble_status_core::*;

pub mod command;
pub mod de;
pub mod fetch;
pub mod identity;
pub mod render;
pub mod service;

pub use command::{
    Command,
    CommandKind,
    CommandOutcome,
    CommandTable,
    StatusCommands,
};

#[cfg(test)]
mod mocks;
