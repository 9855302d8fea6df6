mod lock;
mod store;

pub use lock::*;
pub use store::*;
