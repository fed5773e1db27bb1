//! In-memory storage implementation.
//!
//! Collections are kept as insertion-ordered lists of `(id, document)` pairs
//! behind an async read-write lock, so natural order matches what a database
//! without indexes returns: the order documents were inserted in.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Uuid};
use tracing::trace;

use companydb_core::{
    backend::{DeleteResult, StoreBackend, StoreBackendBuilder, UpdateResult},
    error::{DocumentStoreError, DocumentStoreResult},
    patch::Patch,
    query::{Expr, Query, Scope, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionEntries = Vec<(Uuid, Bson)>;
type StoreMap = HashMap<String, CollectionEntries>;

/// Thread-safe in-memory document storage backend.
///
/// Cloning is cheap and clones share the same data, so one instance can be
/// handed to several tasks. Every query scans the whole collection.
///
/// # Example
///
/// ```ignore
/// use companydb_memory::InMemoryStore;
/// use companydb_core::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = Uuid::new();
///
/// store.insert_documents(vec![(id, Bson::Document(doc! { "id": id, "name": "Ann" }))], "employees").await?;
/// assert_eq!(store.get_documents(vec![id], "employees").await?.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }

    /// Positions of the entries matching `filter`, in natural order, capped by `scope`.
    fn matching(
        entries: &CollectionEntries,
        filter: Option<&Expr>,
        scope: Scope,
    ) -> DocumentStoreResult<Vec<usize>> {
        let mut positions = Vec::new();

        for (position, (_, document)) in entries.iter().enumerate() {
            if DocumentEvaluator::matches(document, filter)? {
                positions.push(position);

                if scope == Scope::One {
                    break;
                }
            }
        }

        Ok(positions)
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let entries = store
            .entry(collection.to_string())
            .or_default();

        for (id, _) in &documents {
            if entries.iter().any(|(existing, _)| existing == id) {
                return Err(DocumentStoreError::DocumentAlreadyExists(id.to_string(), collection.to_string()));
            }
        }

        trace!(collection, count = documents.len(), "memory insert");
        entries.extend(documents);

        Ok(())
    }

    async fn replace_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let entries = match store.get_mut(collection) {
            Some(entries) => entries,
            None => return Err(DocumentStoreError::CollectionNotFound(collection.to_string())),
        };

        let mut positions = Vec::with_capacity(documents.len());

        for (id, _) in &documents {
            match entries.iter().position(|(existing, _)| existing == id) {
                Some(position) => positions.push(position),
                None => return Err(DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string())),
            }
        }

        for (position, (_, document)) in positions.into_iter().zip(documents) {
            entries[position].1 = document;
        }

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<Uuid>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let entries = match store.get(collection) {
            Some(entries) => entries,
            None => return Ok(vec![]),
        };

        Ok(
            ids
                .iter()
                .filter_map(|id| entries
                    .iter()
                    .find(|(existing, _)| existing == id)
                    .map(|(_, document)| document.clone())
                )
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let entries = match store.get(collection) {
            Some(entries) => entries,
            None => return Ok(vec![]),
        };

        let mut documents = Vec::new();

        for (_, document) in entries {
            if DocumentEvaluator::matches(document, query.filter.as_ref())? {
                documents.push(document);
            }
        }

        if let Some(sort) = &query.sort {
            // Stable sort keeps natural order among equal keys.
            documents.sort_by(|a, b| {
                let left = Comparable::field(a, &sort.field);
                let right = Comparable::field(b, &sort.field);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        Ok(
            documents
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        )
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;

        match store.get(collection) {
            Some(entries) => Ok(Self::matching(entries, filter.as_ref(), Scope::Many)?.len() as u64),
            None => Ok(0),
        }
    }

    async fn update_documents(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        let mut store = self.store.write().await;
        let entries = match store.get_mut(collection) {
            Some(entries) => entries,
            None => return Ok(UpdateResult::default()),
        };

        let positions = Self::matching(entries, filter.as_ref(), scope)?;
        let mut result = UpdateResult { matched: positions.len() as u64, modified: 0 };

        for position in positions {
            let Some(document) = entries[position].1.as_document_mut() else {
                continue;
            };

            let before = document.clone();
            patch.apply_to(document);

            if *document != before {
                result.modified += 1;
            }
        }

        trace!(collection, matched = result.matched, modified = result.modified, "memory update");

        Ok(result)
    }

    async fn delete_documents(
        &self,
        filter: Option<Expr>,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<DeleteResult> {
        let mut store = self.store.write().await;
        let entries = match store.get_mut(collection) {
            Some(entries) => entries,
            None => return Ok(DeleteResult::default()),
        };

        let positions = Self::matching(entries, filter.as_ref(), scope)?;

        // Highest position first so earlier removals don't shift later ones.
        for position in positions.iter().rev() {
            entries.remove(*position);
        }

        trace!(collection, deleted = positions.len(), "memory delete");

        Ok(DeleteResult { deleted: positions.len() as u64 })
    }
}

/// Builder for [`InMemoryStore`]. There is nothing to configure.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use companydb_core::query::Filter;

    fn employee(first: &str) -> (Uuid, Bson) {
        let id = Uuid::new();

        (id, Bson::Document(doc! { "id": id, "firstName": first, "lastName": "Doe" }))
    }

    async fn seeded() -> (InMemoryStore, Vec<Uuid>) {
        let store = InMemoryStore::new();
        let documents = vec![employee("One"), employee("Two"), employee("Three")];
        let ids = documents.iter().map(|(id, _)| *id).collect();

        store.insert_documents(documents, "employees").await.unwrap();

        (store, ids)
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let (store, ids) = seeded().await;
        let duplicate = (ids[0], Bson::Document(doc! { "id": ids[0] }));

        let err = store.insert_documents(vec![duplicate], "employees").await.unwrap_err();

        assert!(matches!(err, DocumentStoreError::DocumentAlreadyExists(..)));
        assert_eq!(store.count_documents(None, "employees").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn query_keeps_insertion_order() {
        let (store, _) = seeded().await;
        let names = store
            .query_documents(Query::new(), "employees")
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.as_document().unwrap().get_str("firstName").unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, ["One", "Two", "Three"]);
    }

    #[tokio::test]
    async fn query_sorts_and_windows() {
        let (store, _) = seeded().await;
        let query = Query::builder()
            .sort("firstName", SortDirection::Desc)
            .offset(1)
            .limit(1)
            .build();

        let documents = store.query_documents(query, "employees").await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].as_document().unwrap().get_str("firstName").unwrap(), "Three");
    }

    #[tokio::test]
    async fn update_one_touches_first_match_only() {
        let (store, _) = seeded().await;

        let result = store
            .update_documents(None, Patch::new().set("lastName", "Smith"), Scope::One, "employees")
            .await
            .unwrap();

        assert_eq!(result, UpdateResult { matched: 1, modified: 1 });
        assert_eq!(store.count_documents(Some(Filter::eq("lastName", "Smith")), "employees").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_many_counts_unchanged_documents_as_matched() {
        let (store, _) = seeded().await;

        store
            .update_documents(
                Some(Filter::eq("firstName", "One")),
                Patch::new().set("lastName", "Smith"),
                Scope::One,
                "employees",
            )
            .await
            .unwrap();

        let result = store
            .update_documents(None, Patch::new().set("lastName", "Smith"), Scope::Many, "employees")
            .await
            .unwrap();

        assert_eq!(result, UpdateResult { matched: 3, modified: 2 });
    }

    #[tokio::test]
    async fn delete_many_removes_all_matches() {
        let (store, ids) = seeded().await;

        let result = store
            .delete_documents(Some(Filter::ne("firstName", "Two")), Scope::Many, "employees")
            .await
            .unwrap();

        assert_eq!(result.deleted, 2);
        assert_eq!(store.get_documents(ids.clone(), "employees").await.unwrap().len(), 1);
        assert_eq!(store.get_documents(vec![ids[1]], "employees").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let store = InMemoryStore::new();

        assert!(store.query_documents(Query::new(), "nothing").await.unwrap().is_empty());
        assert_eq!(store.count_documents(None, "nothing").await.unwrap(), 0);
        assert_eq!(
            store.delete_documents(None, Scope::Many, "nothing").await.unwrap(),
            DeleteResult::default(),
        );
        assert!(matches!(
            store.replace_documents(vec![employee("One")], "nothing").await.unwrap_err(),
            DocumentStoreError::CollectionNotFound(_),
        ));
    }

    #[tokio::test]
    async fn replace_missing_document_fails() {
        let (store, _) = seeded().await;

        let err = store.replace_documents(vec![employee("Four")], "employees").await.unwrap_err();

        assert!(matches!(err, DocumentStoreError::DocumentNotFound(..)));
    }
}
