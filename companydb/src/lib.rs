//! Entry point of the companydb object-document mapper.
//!
//! Re-exports the core API and the storage backends. Entities implement
//! [`Document`](document::Document) and declare a [`Schema`](schema::Schema);
//! a [`DocumentStore`](store::DocumentStore) hands out typed collections
//! with the usual data access operations.
//!
//! # Quick Start
//!
//! ```ignore
//! use companydb::{prelude::*, memory::InMemoryStore};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct Employee {
//!     pub id: Uuid,
//!     pub first_name: String,
//!     pub last_name: String,
//! }
//!
//! impl Document for Employee {
//!     fn id(&self) -> &Uuid { &self.id }
//!     fn collection_name() -> &'static str { "employees" }
//!
//!     fn schema() -> Schema {
//!         Schema::builder()
//!             .required("firstName", FieldType::String)
//!             .required("lastName", FieldType::String)
//!             .build()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let employees = store.typed_collection::<Employee>();
//!
//!     let mut john = Model::<Employee>::from_input(bson::doc! {
//!         "firstName": "John",
//!         "lastName": "Doe",
//!     })?;
//!     john.save(&employees).await?;
//!
//!     employees
//!         .update_many(None, Patch::new().set("lastName", "Updated!"))
//!         .await?;
//!
//!     let found = employees.find_one(Filter::eq("firstName", "John")).await?;
//!     println!("{found:?}");
//!
//!     store.shutdown().await
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - in-process storage for development and tests
//! - [`mongodb`] - MongoDB storage (requires the `mongodb` feature)
//!
//! A backend picked at runtime goes through
//! [`DocumentStore::into_dyn`](store::DocumentStore::into_dyn).

pub mod prelude;

pub use companydb_core::{backend, collection, document, error, model, patch, query, schema, store};

pub use bson;

/// In-memory storage backend.
pub mod memory {
    pub use companydb_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend.
///
/// Only available with the `mongodb` feature.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use companydb_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
