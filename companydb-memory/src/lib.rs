//! In-memory document storage backend for companydb.
//!
//! Intended for development and tests: every test builds its own
//! [`InMemoryStore`], so tests never share data.
//!
//! ```ignore
//! use companydb::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let employees = store.typed_collection::<Employee>();
//! ```

pub mod store;
mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
