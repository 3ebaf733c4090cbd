//! confidence 固有のドメイン型

pub mod command;
pub mod outcome;

pub use command::{ConfidenceCommand, LabelSource};
pub use outcome::{non_blank_label, RelayOutcome};
