// Application layer - use cases and orchestration.
// Every client (CLI, HTTP) goes through `WalletService`; nothing else touches the store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
