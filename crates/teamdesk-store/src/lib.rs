//! # teamdesk-store
//!
//! In-memory stand-ins for the hosted collaborators.
//!
//! ## Features
//!
//! - **Document store**: one `MemoryCollection` per collection, realtime
//!   snapshots over `tokio::sync::watch`, stable ordering, write-failure injection
//! - **Identity provider**: accounts, a signed-in slot, verification bookkeeping
//! - **Export sinks**: JSON files on disk, or captured in memory
//! - **Seeding**: load initial documents from a JSON file
//!
//! ## Example
//!
//! ```ignore
//! use teamdesk_store::{MemoryStore, Seed};
//!
//! let store = MemoryStore::new();
//! store.load(Seed::from_json(json)?);
//!
//! let mut tasks = store.tasks.subscribe();
//! while tasks.changed().await.is_ok() {
//!     let snapshot = tasks.borrow_and_update().clone();
//!     // re-derive from the snapshot
//! }
//! ```

pub mod collection;
pub mod export;
pub mod identity;
pub mod store;

pub use collection::MemoryCollection;
pub use export::{ExportedWorkbook, JsonExportSink, MemoryExportSink};
pub use identity::MemoryIdentityProvider;
pub use store::{MemoryStore, Seed};
