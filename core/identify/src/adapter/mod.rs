//! identify のアダプタ（ポートの標準実装）

pub mod case_store;
pub mod reasoning_client;

pub use case_store::FsCaseStore;
pub use reasoning_client::ReasoningClient;
