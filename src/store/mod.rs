//! Per-app local record store
//!
//! - Entries and their display names
//! - Model declarations and identifier validation
//! - The SQLite-backed store itself

pub mod entry;
pub mod model;
pub mod record_store;

pub use entry::{DisplayFields, Entry};
pub use model::{ModelCatalog, ModelSpec};
pub use record_store::{DatabaseFile, RecordStore};
