//! Partial updates applied to matching documents.

use bson::{Bson, Document as BsonDocument};

const SET_OPERATOR: &str = "$set";

/// A set of field assignments applied by `update_one` and `update_many`.
///
/// ```ignore
/// use companydb::prelude::*;
///
/// let patch = Patch::new().set("firstName", "Updated");
/// ```
///
/// A patch can also be built from a BSON document, either with plain
/// `field: value` pairs or wrapped in a `$set` operator:
///
/// ```ignore
/// let a = Patch::from(doc! { "firstName": "Updated" });
/// let b = Patch::from(doc! { "$set": { "firstName": "Updated" } });
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: BsonDocument,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` to `field`, replacing any earlier assignment.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the assignments.
    pub fn iter(&self) -> bson::document::Iter<'_> {
        self.fields.iter()
    }

    /// Returns the assignments as a BSON document.
    pub fn as_document(&self) -> &BsonDocument {
        &self.fields
    }

    /// Applies the assignments to `document` in place.
    pub fn apply_to(&self, document: &mut BsonDocument) {
        for (field, value) in &self.fields {
            document.insert(field.clone(), value.clone());
        }
    }
}

impl From<BsonDocument> for Patch {
    fn from(mut document: BsonDocument) -> Self {
        match document.remove(SET_OPERATOR) {
            Some(Bson::Document(fields)) if document.is_empty() => Self { fields },
            Some(other) => {
                document.insert(SET_OPERATOR, other);
                Self { fields: document }
            }
            None => Self { fields: document },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn set_operator_is_unwrapped() {
        let plain = Patch::from(doc! { "firstName": "UPDATED!" });
        let wrapped = Patch::from(doc! { "$set": { "firstName": "UPDATED!" } });

        assert_eq!(plain, wrapped);
        assert_eq!(plain, Patch::new().set("firstName", "UPDATED!"));
    }

    #[test]
    fn apply_overwrites_and_adds_fields() {
        let mut document = doc! { "firstName": "Ann", "lastName": "Lee" };

        Patch::new()
            .set("firstName", "Anna")
            .set("department", "IT")
            .apply_to(&mut document);

        assert_eq!(document, doc! { "firstName": "Anna", "lastName": "Lee", "department": "IT" });
    }
}
