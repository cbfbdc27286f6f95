mod chat;
mod error;
mod listen;
mod prefs;
mod promotion;

pub use chat::*;
pub use error::*;
pub use listen::*;
pub use prefs::*;
pub use promotion::*;


#[cfg(test)]
mod tests;
