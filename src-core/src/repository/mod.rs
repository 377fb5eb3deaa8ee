//! Repository Layer
//!
//! Data access abstractions and implementations.

mod contact_record;
mod contact_repo;
mod db;
mod traits;


pub use contact_record::ContactRecord;
pub use contact_repo::{ContactRepository, CONTACTS_STORAGE_KEY};
pub use db::{init_db, DbState, MemoryStore, SqliteStore};
pub use traits::{KeyValueStore, Repository};
