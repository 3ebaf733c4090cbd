//! Outbound ポート: アプリが外界（推論 API・ファイル）を使うための trait

pub mod case_store;
pub mod reasoner;

pub use case_store::CaseStore;
pub use reasoner::Reasoner;
