// Application layer: the operations a client (CLI, tests) performs on the
// expense ledger. Persistence is delegated to `storage::Store`.

pub mod error;
mod service;

pub use error::*;
pub use service::*;
