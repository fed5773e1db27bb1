//! MongoDB storage backend for companydb.
//!
//! Enable it through the facade crate:
//!
//! ```toml
//! [dependencies]
//! companydb = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! Documents are stored with their identity duplicated into `_id`, so
//! lookups by id hit MongoDB's primary index. Reserved characters in field
//! names are escaped on write and restored on read.
//!
//! ```ignore
//! use companydb::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! let backend = MongoDbStore::builder("mongodb://localhost:27017", "companyDB")
//!     .build()
//!     .await?;
//! ```

mod query;
mod sanitizer;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
