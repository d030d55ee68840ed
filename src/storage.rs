mod backend;
mod persistence;
mod snapshot;
/// The authoritative in-memory data store.
pub mod store;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use persistence::{Persistence, SaveError};
pub use snapshot::{export_snapshot, parse_snapshot};
pub use store::{ImportError, Store};
