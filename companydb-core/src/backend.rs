//! Storage backend abstraction for the document store.
//!
//! [`StoreBackend`] is the async interface every storage implementation
//! provides (in-memory, MongoDB). Backends see documents as BSON values keyed
//! by UUID; typing and schema validation happen above them, in
//! [`crate::collection`].
//!
//! [`DynStoreBackend`] is its object-safe mirror. `Box<dyn DynStoreBackend>`
//! implements [`StoreBackend`] itself, so a backend chosen at runtime plugs
//! into the same generic store and collection types.

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::fmt::Debug;

use crate::{
    error::DocumentStoreResult,
    patch::Patch,
    query::{Expr, Query, Scope},
};

/// Outcome of a filtered update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents matching the filter (at most one for [`Scope::One`]).
    pub matched: u64,
    /// Documents whose content changed.
    pub modified: u64,
}

/// Outcome of a filtered delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted: u64,
}

#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Stores new documents. Fails if any ID is already present.
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Replaces whole documents by ID. Fails if any ID is missing.
    async fn replace_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Fetches documents by ID, silently skipping unknown IDs.
    async fn get_documents(
        &self,
        ids: Vec<Uuid>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Runs a query. Without a sort, results come back in natural (insertion) order.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Applies `patch` to the first match or to every match of `filter`.
    async fn update_documents(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult>;

    /// Deletes the first match or every match of `filter`.
    async fn delete_documents(
        &self,
        filter: Option<Expr>,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<DeleteResult>;

    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()>;
    async fn replace_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()>;
    async fn get_documents(
        &self,
        ids: Vec<Uuid>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;
    async fn update_documents(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult>;
    async fn delete_documents(
        &self,
        filter: Option<Expr>,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<DeleteResult>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::insert_documents(self, documents, collection).await
    }

    async fn replace_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::replace_documents(self, documents, collection).await
    }

    async fn get_documents(
        &self,
        ids: Vec<Uuid>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::get_documents(self, ids, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        StoreBackend::count_documents(self, filter, collection).await
    }

    async fn update_documents(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        StoreBackend::update_documents(self, filter, patch, scope, collection).await
    }

    async fn delete_documents(
        &self,
        filter: Option<Expr>,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<DeleteResult> {
        StoreBackend::delete_documents(self, filter, scope, collection).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        (**self)
            .insert_documents(documents, collection)
            .await
    }

    async fn replace_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        (**self)
            .replace_documents(documents, collection)
            .await
    }

    async fn get_documents(
        &self,
        ids: Vec<Uuid>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        (**self)
            .get_documents(ids, collection)
            .await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        (**self)
            .query_documents(query, collection)
            .await
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        (**self)
            .count_documents(filter, collection)
            .await
    }

    async fn update_documents(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        (**self)
            .update_documents(filter, patch, scope, collection)
            .await
    }

    async fn delete_documents(
        &self,
        filter: Option<Expr>,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<DeleteResult> {
        (**self)
            .delete_documents(filter, scope, collection)
            .await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        DynStoreBackend::shutdown_boxed(self).await
    }
}

/// Factory for backends that need async setup (connections, pools).
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
