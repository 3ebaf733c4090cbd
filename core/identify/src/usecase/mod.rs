//! identify のユースケース

pub mod identify;

pub use identify::IdentifyUseCase;
