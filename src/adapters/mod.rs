// Adapters layer: concrete implementations for external systems (filesystem, processes).

pub mod process;
pub mod storage;

pub use process::{SearchPathResolver, TokioProcessRunner};
pub use storage::LocalStorage;
