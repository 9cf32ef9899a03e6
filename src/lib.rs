pub mod cli;
pub mod config;
pub mod dates;
pub mod entity;
pub mod error;
pub mod query;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{DpccError, Result};
pub use storage::{KeyValueStore, LoroStore, MemoryStore};
pub use store::ProjectStore;
