//! The document store: one backend handle plus typed collection access.
//!
//! A store is an explicit context. Each server instance and each test builds
//! its own, so nothing about registered document types or connections is
//! shared process-wide.
//!
//! ```ignore
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let employees = store.typed_collection::<Employee>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store over a statically known backend.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

/// A document store over a backend chosen at runtime.
pub type DynDocumentStore = DocumentStore<Box<dyn DynStoreBackend>>;

impl<B: StoreBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the backend this store drives.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets the collection of `D`, named by `D::collection_name()`.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Shuts the backend down, closing any connections it holds.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}

impl<B: StoreBackend + 'static> DocumentStore<B> {
    /// Erases the backend type.
    pub fn into_dyn(self) -> DynDocumentStore {
        let backend: Box<dyn DynStoreBackend> = Box::new(self.backend);

        DocumentStore::new(backend)
    }
}
