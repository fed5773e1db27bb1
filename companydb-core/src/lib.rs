//! Object-document mapping core for companydb.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - typed documents bound to collections and schemas
//! - **Schemas** ([`schema`]) - declarative field constraints and structured validation errors
//! - **Queries** ([`query`]) - filter expressions, sorting and windowing
//! - **Patches** ([`patch`]) - partial updates for `update_one`/`update_many`
//! - **Backends** ([`backend`]) - the async storage interface implemented per database
//! - **Collections** ([`collection`]) - typed find/insert/update/delete operations
//! - **Models** ([`model`]) - document instances with `save`/`remove`
//! - **Store** ([`store`]) - the explicit store context handing out collections
//! - **Errors** ([`error`])
//!
//! # Example
//!
//! ```ignore
//! use companydb_core::{document::Document, schema::{Schema, FieldType}};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Product {
//!     pub id: Uuid,
//!     pub name: String,
//!     pub client: String,
//! }
//!
//! impl Document for Product {
//!     fn id(&self) -> &Uuid {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "products"
//!     }
//!
//!     fn schema() -> Schema {
//!         Schema::builder()
//!             .required("name", FieldType::String)
//!             .required("client", FieldType::String)
//!             .build()
//!     }
//! }
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod model;
pub mod patch;
pub mod query;
pub mod schema;
pub mod store;
