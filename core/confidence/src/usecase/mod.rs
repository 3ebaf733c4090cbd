//! confidence のユースケース

pub mod relay;

pub use relay::{label_from_result, RelayUseCase};
