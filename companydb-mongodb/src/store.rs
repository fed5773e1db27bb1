use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Bson, Document, Uuid, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use tracing::{debug, info};

use companydb_core::{
    backend::{DeleteResult, StoreBackend, StoreBackendBuilder, UpdateResult},
    error::{DocumentStoreError, DocumentStoreResult},
    patch::Patch,
    query::{Expr, Query, Scope, SortDirection},
};

use crate::{query::MongoQueryTranslator, sanitizer::KeySanitizer};

const MONGO_ID: &str = "_id";

fn backend_error(err: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

/// MongoDB-backed store. Each document is stored with its identity as `_id`.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&KeySanitizer::sanitize_key(collection_name))
    }

    fn prepare_document(&self, id: &Uuid, document: &Bson) -> DocumentStoreResult<Document> {
        let mut prepared = document
            .as_document()
            .map(KeySanitizer::sanitize_document)
            .ok_or_else(|| DocumentStoreError::InvalidDocument("Expected document".into()))?;

        prepared.insert(MONGO_ID, *id);

        Ok(prepared)
    }

    fn restore_document(&self, mut document: Document) -> Bson {
        document.remove(MONGO_ID);

        Bson::Document(KeySanitizer::restore_document(&document))
    }

    fn prepare_patch(patch: &Patch) -> Document {
        doc! { "$set": KeySanitizer::sanitize_document(patch.as_document()) }
    }

    async fn find(&self, filter: Document, options: FindOptions, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        Ok(
            self.get_collection(collection)
                .find(filter)
                .with_options(options)
                .await
                .map_err(backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(backend_error)?
                .into_iter()
                .map(|document| self.restore_document(document))
                .collect()
        )
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|(id, doc)| self.prepare_document(id, doc))
                    .collect::<DocumentStoreResult<Vec<Document>>>()?,
            )
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn replace_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let target = self.get_collection(collection);

        for (id, document) in documents {
            let result = target
                .replace_one(doc! { MONGO_ID: id }, self.prepare_document(&id, &document)?)
                .await
                .map_err(backend_error)?;

            if result.matched_count == 0 {
                return Err(DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string()));
            }
        }

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<Uuid>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        self.find(doc! { MONGO_ID: { "$in": ids } }, FindOptions::default(), collection).await
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                KeySanitizer::sanitize_key(&sort.field): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }

        let filter = MongoQueryTranslator::translate(query.filter.as_ref())?;

        self.find(filter, options, collection).await
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        self.get_collection(collection)
            .count_documents(MongoQueryTranslator::translate(filter.as_ref())?)
            .await
            .map_err(backend_error)
    }

    async fn update_documents(
        &self,
        filter: Option<Expr>,
        patch: Patch,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        let target = self.get_collection(collection);
        let filter = MongoQueryTranslator::translate(filter.as_ref())?;
        let update = Self::prepare_patch(&patch);

        debug!(collection, ?scope, %filter, "mongodb update");

        let result = match scope {
            Scope::One => target.update_one(filter, update).await,
            Scope::Many => target.update_many(filter, update).await,
        }
        .map_err(backend_error)?;

        Ok(UpdateResult {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_documents(
        &self,
        filter: Option<Expr>,
        scope: Scope,
        collection: &str,
    ) -> DocumentStoreResult<DeleteResult> {
        let target = self.get_collection(collection);
        let filter = MongoQueryTranslator::translate(filter.as_ref())?;

        debug!(collection, ?scope, %filter, "mongodb delete");

        let result = match scope {
            Scope::One => target.delete_one(filter).await,
            Scope::Many => target.delete_many(filter).await,
        }
        .map_err(backend_error)?;

        Ok(DeleteResult { deleted: result.deleted_count })
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        info!(database = %self.database, "closing mongodb client");
        self.client.shutdown().await;

        Ok(())
    }
}

/// Connects a [`MongoDbStore`] from a connection string.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        info!(database = %self.database, "mongodb client ready");

        Ok(MongoDbStore::new(client, self.database))
    }
}
