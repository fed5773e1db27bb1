//! Typed access to one collection.
//!
//! [`TypedCollection`] is the data access layer: it serializes documents,
//! validates them against their [`Schema`](crate::schema::Schema), and hands
//! BSON to the backend. Lookups return `Option`/`Vec`, never a "not found"
//! error.
//!
//! # Example
//!
//! ```ignore
//! let employees = store.typed_collection::<Employee>();
//!
//! employees.insert(vec![one, two]).await?;
//! assert_eq!(employees.find(None).await?.len(), 2);
//!
//! employees
//!     .update_one(
//!         Filter::eq("firstName", "Test firstName One"),
//!         Patch::new().set("firstName", "Test firstName One Updated"),
//!     )
//!     .await?;
//! ```

use bson::{Bson, Uuid};
use rand::Rng;
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::{DeleteResult, StoreBackend, UpdateResult},
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    model::Model,
    patch::Patch,
    query::{Expr, Filter, Query, Scope},
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every document matching `filter`; `None` returns all of them.
    pub async fn find(&self, filter: impl Into<Option<Expr>>) -> DocumentStoreResult<Vec<D>> {
        self.query(Query::builder().filter(filter).build()).await
    }

    /// Returns the first document matching `filter`, if any.
    pub async fn find_one(&self, filter: impl Into<Option<Expr>>) -> DocumentStoreResult<Option<D>> {
        Ok(self
            .query(
                Query::builder()
                    .filter(filter)
                    .limit(1)
                    .build(),
            )
            .await?
            .into_iter()
            .next())
    }

    /// Returns the document with the given identity, if any.
    pub async fn find_by_id(&self, id: Uuid) -> DocumentStoreResult<Option<D>> {
        self.backend
            .get_documents(vec![id], self.name())
            .await?
            .into_iter()
            .next()
            .map(D::from_bson)
            .transpose()
    }

    /// Returns one document picked uniformly at random, or `None` when the
    /// collection is empty.
    pub async fn find_random(&self) -> DocumentStoreResult<Option<D>> {
        let count = self.count(None).await?;

        if count == 0 {
            return Ok(None);
        }

        let offset = rand::thread_rng().gen_range(0..count) as usize;

        Ok(self
            .query(
                Query::builder()
                    .offset(offset)
                    .limit(1)
                    .build(),
            )
            .await?
            .into_iter()
            .next())
    }

    /// Runs a structured query.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }

    /// Counts documents matching `filter`; `None` counts all of them.
    pub async fn count(&self, filter: impl Into<Option<Expr>>) -> DocumentStoreResult<u64> {
        self.backend
            .count_documents(filter.into(), self.name())
            .await
    }

    /// Validates and stores new documents.
    ///
    /// Nothing is written if any document fails validation.
    pub async fn insert(&self, documents: Vec<D>) -> DocumentStoreResult<()> {
        let documents = self.prepare(documents)?;

        debug!(collection = %self.name, count = documents.len(), "inserting documents");

        self.backend
            .insert_documents(documents, self.name())
            .await
    }

    pub async fn insert_one(&self, document: D) -> DocumentStoreResult<()> {
        self.insert(vec![document]).await
    }

    /// Validates `document` and replaces the stored document with the same
    /// identity. Fails with `DocumentNotFound` if there is none.
    pub async fn replace(&self, document: D) -> DocumentStoreResult<()> {
        let documents = self.prepare(vec![document])?;

        debug!(collection = %self.name, "replacing document");

        self.backend
            .replace_documents(documents, self.name())
            .await
    }

    /// Applies `patch` to the first document matching `filter`.
    pub async fn update_one(
        &self,
        filter: impl Into<Option<Expr>>,
        patch: impl Into<Patch>,
    ) -> DocumentStoreResult<UpdateResult> {
        self.update(filter.into(), patch.into(), Scope::One).await
    }

    /// Applies `patch` to every document matching `filter`.
    pub async fn update_many(
        &self,
        filter: impl Into<Option<Expr>>,
        patch: impl Into<Patch>,
    ) -> DocumentStoreResult<UpdateResult> {
        self.update(filter.into(), patch.into(), Scope::Many).await
    }

    /// Deletes the first document matching `filter`.
    pub async fn delete_one(&self, filter: impl Into<Option<Expr>>) -> DocumentStoreResult<DeleteResult> {
        self.delete(filter.into(), Scope::One).await
    }

    /// Deletes every document matching `filter`.
    pub async fn delete_many(&self, filter: impl Into<Option<Expr>>) -> DocumentStoreResult<DeleteResult> {
        self.delete(filter.into(), Scope::Many).await
    }

    /// Deletes the document with the given identity.
    pub async fn delete_by_id(&self, id: Uuid) -> DocumentStoreResult<DeleteResult> {
        self.delete(Some(Filter::id(id)), Scope::One).await
    }

    /// Like [`find_one`](Self::find_one), but wraps the match in a persisted
    /// [`Model`] that can be modified and saved or removed.
    pub async fn load(&self, filter: impl Into<Option<Expr>>) -> DocumentStoreResult<Option<Model<D>>> {
        Ok(self
            .find_one(filter)
            .await?
            .map(Model::persisted))
    }

    async fn update(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
    ) -> DocumentStoreResult<UpdateResult> {
        D::schema().validate_patch(&patch)?;

        let result = self.backend
            .update_documents(filter, patch, scope, self.name())
            .await?;

        debug!(
            collection = %self.name,
            ?scope,
            matched = result.matched,
            modified = result.modified,
            "updated documents",
        );

        Ok(result)
    }

    async fn delete(&self, filter: Option<Expr>, scope: Scope) -> DocumentStoreResult<DeleteResult> {
        let result = self.backend
            .delete_documents(filter, scope, self.name())
            .await?;

        debug!(collection = %self.name, ?scope, deleted = result.deleted, "deleted documents");

        Ok(result)
    }

    fn prepare(&self, documents: Vec<D>) -> DocumentStoreResult<Vec<(Uuid, Bson)>> {
        let schema = D::schema();

        documents
            .into_iter()
            .map(|d| {
                let document = d.to_document()?;
                schema.validate(&document)?;

                Ok((*d.id(), Bson::Document(document)))
            })
            .collect()
    }
}
