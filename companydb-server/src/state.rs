use std::sync::Arc;

use companydb::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    memory::InMemoryStore,
    store::{DocumentStore, DynDocumentStore},
};
use tracing::info;

use crate::config::{Config, StoreBackendKind};

/// Shared handler state: the document store the routes operate on.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<DynDocumentStore>,
}

impl AppState {
    pub fn new(store: DynDocumentStore) -> Self {
        Self { store: Arc::new(store) }
    }

    /// Connects the backend selected by `config`.
    pub async fn initialize(config: &Config) -> DocumentStoreResult<Self> {
        let store = match config.store_backend {
            StoreBackendKind::Memory => DocumentStore::new(InMemoryStore::builder().build().await?).into_dyn(),
            StoreBackendKind::MongoDb => connect_mongodb(config).await?,
        };

        info!(backend = %config.store_backend, "document store ready");

        Ok(Self::new(store))
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(config: &Config) -> DocumentStoreResult<DynDocumentStore> {
    use companydb::mongodb::MongoDbStore;

    let backend = MongoDbStore::builder(&config.mongodb_uri, &config.mongodb_database)
        .build()
        .await?;

    Ok(DocumentStore::new(backend).into_dyn())
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_config: &Config) -> DocumentStoreResult<DynDocumentStore> {
    Err(companydb::error::DocumentStoreError::Initialization(
        "built without the `mongodb` feature".into(),
    ))
}
