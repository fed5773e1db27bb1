//! Document instances with a persistence lifecycle.
//!
//! A [`Model`] wraps a document and remembers whether it has been stored yet.
//! `save` inserts a new model and replaces a stored one; `remove` deletes it.
//! Fields are reached through `Deref`/`DerefMut`:
//!
//! ```ignore
//! let mut employee = employees
//!     .load(Filter::eq("firstName", "Test firstName One"))
//!     .await?
//!     .unwrap();
//!
//! employee.first_name = "Test firstName One Updated".into();
//! employee.save(&employees).await?;
//! ```

use bson::{Bson, Document as BsonDocument, Uuid};
use std::ops::{Deref, DerefMut};

use crate::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::{Document, DocumentExt, ID_FIELD},
    error::DocumentStoreResult,
};

#[derive(Debug, Clone)]
pub struct Model<D: Document> {
    document: D,
    is_new: bool,
}

impl<D: Document> Model<D> {
    /// Wraps a document that has not been stored yet.
    pub fn new(document: D) -> Self {
        Self { document, is_new: true }
    }

    pub(crate) fn persisted(document: D) -> Self {
        Self { document, is_new: false }
    }

    /// Builds a new model from untyped input, such as a request body.
    ///
    /// The input is validated against `D::schema()` before deserialization.
    /// Any `id` it carries is discarded and a fresh identity is assigned.
    pub fn from_input(input: BsonDocument) -> DocumentStoreResult<Self> {
        Self::from_input_with_id(input, Uuid::new())
    }

    /// Like [`from_input`](Self::from_input), with a caller-chosen identity.
    pub fn from_input_with_id(mut input: BsonDocument, id: Uuid) -> DocumentStoreResult<Self> {
        D::schema().validate(&input)?;

        input.insert(ID_FIELD, id);

        Ok(Self::new(D::from_bson(Bson::Document(input))?))
    }

    /// True until the model has been saved (or if it was never loaded from a store).
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Validates the current field values against `D::schema()`.
    ///
    /// Schema violations come back as
    /// [`DocumentStoreError::Validation`](crate::error::DocumentStoreError::Validation).
    pub fn validate(&self) -> DocumentStoreResult<()> {
        D::schema().validate(&self.document.to_document()?)?;

        Ok(())
    }

    /// Inserts the model when new, replaces the stored copy otherwise.
    pub async fn save<B: StoreBackend>(
        &mut self,
        collection: &TypedCollection<'_, B, D>,
    ) -> DocumentStoreResult<()> {
        if self.is_new {
            collection.insert_one(self.document.clone()).await?;
            self.is_new = false;
        } else {
            collection.replace(self.document.clone()).await?;
        }

        Ok(())
    }

    /// Deletes the stored copy. Returns whether a document was deleted.
    pub async fn remove<B: StoreBackend>(
        self,
        collection: &TypedCollection<'_, B, D>,
    ) -> DocumentStoreResult<bool> {
        Ok(collection
            .delete_by_id(*self.document.id())
            .await?
            .deleted > 0)
    }

    pub fn into_inner(self) -> D {
        self.document
    }
}

impl<D: Document> Deref for Model<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.document
    }
}

impl<D: Document> DerefMut for Model<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.document
    }
}
