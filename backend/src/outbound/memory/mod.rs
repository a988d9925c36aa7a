//! In-process record store used when no database is configured.

mod directory;
mod seed;
mod store;

pub use self::store::MemoryStore;
