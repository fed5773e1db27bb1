//! Commonly used types, importable in one line:
//!
//! ```ignore
//! use companydb::prelude::*;
//! ```

pub use companydb_core::{
    backend::{DeleteResult, DynStoreBackend, StoreBackend, StoreBackendBuilder, UpdateResult},
    collection::TypedCollection,
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult},
    model::Model,
    patch::Patch,
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, QueryVisitor, Scope, Sort, SortDirection},
    schema::{FieldError, FieldErrorKind, FieldType, Schema, ValidationErrors},
    store::{DocumentStore, DynDocumentStore},
};
