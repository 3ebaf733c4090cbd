//! identify 固有のドメイン型（型と不変条件）

pub mod command;
pub mod prompt;

pub use command::IdentifyCommand;
