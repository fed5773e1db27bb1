//! Declarative document schemas and validation.
//!
//! A [`Schema`] lists the fields of a document together with their type and
//! whether they are required. Validation never fails fast: it inspects every
//! declared field and reports all violations at once as [`ValidationErrors`],
//! keyed by field name.
//!
//! ```ignore
//! use companydb::prelude::*;
//! use bson::doc;
//!
//! let schema = Schema::builder()
//!     .required("firstName", FieldType::String)
//!     .optional("department", FieldType::String)
//!     .build();
//!
//! let errors = schema.validate(&doc! { "firstName": [] }).unwrap_err();
//! assert!(errors.contains("firstName"));
//! ```

use std::{collections::BTreeMap, fmt};

use bson::{Bson, Document as BsonDocument};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{document::ID_FIELD, patch::Patch};

/// Value type a schema field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A BSON string.
    String,
    /// Any BSON number (int32, int64 or double).
    Number,
    /// A BSON boolean.
    Boolean,
}

impl FieldType {
    fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Bson) -> bool {
        matches!(
            (self, value),
            (FieldType::String, Bson::String(_))
                | (FieldType::Number, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_))
                | (FieldType::Boolean, Bson::Boolean(_))
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single declared field of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The stored field name.
    pub name: String,
    /// The accepted value type.
    pub field_type: FieldType,
    /// Whether the field must be present, non-null and (for strings) non-empty.
    pub required: bool,
}

/// Declarative description of a document's fields.
///
/// The identity field and fields the schema does not declare are not checked
/// by [`Schema::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates a new schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Returns the declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|spec| spec.name == name)
    }

    /// Validates a whole document against this schema.
    ///
    /// Returns every violation found, keyed by field name.
    pub fn validate(&self, document: &BsonDocument) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for spec in &self.fields {
            if let Some(error) = Self::check(spec, document.get(&spec.name)) {
                errors.insert(spec.name.clone(), error);
            }
        }

        errors.into_result()
    }

    /// Validates a patch against this schema.
    ///
    /// Patched fields are checked with the same rules as [`Schema::validate`].
    /// The identity field can never be patched, and when the schema declares
    /// any field, patching an undeclared field is rejected.
    pub fn validate_patch(&self, patch: &Patch) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (field, value) in patch.iter() {
            if field == ID_FIELD {
                errors.insert(field.clone(), FieldError::immutable(field));
                continue;
            }

            match self.field(field) {
                Some(spec) => {
                    if let Some(error) = Self::check(spec, Some(value)) {
                        errors.insert(field.clone(), error);
                    }
                }
                None if !self.fields.is_empty() => {
                    errors.insert(field.clone(), FieldError::unknown(field));
                }
                None => {}
            }
        }

        errors.into_result()
    }

    fn check(spec: &FieldSpec, value: Option<&Bson>) -> Option<FieldError> {
        match value {
            None | Some(Bson::Null) => spec
                .required
                .then(|| FieldError::required(&spec.name)),
            Some(value) if !spec.field_type.matches(value) => {
                Some(FieldError::type_mismatch(&spec.name, spec.field_type, value))
            }
            Some(Bson::String(value)) if spec.required && value.is_empty() => {
                Some(FieldError::required(&spec.name))
            }
            Some(_) => None,
        }
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Declares a required field.
    pub fn required(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(name, field_type, true)
    }

    /// Declares an optional field.
    pub fn optional(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(name, field_type, false)
    }

    fn field(mut self, name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        let name = name.into();

        self.fields.retain(|spec| spec.name != name);
        self.fields.push(FieldSpec { name, field_type, required });
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        Schema { fields: self.fields }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required field is missing, null or an empty string.
    Required,
    /// The field holds a value of the wrong type.
    TypeMismatch {
        /// The type the schema declares.
        expected: FieldType,
        /// Name of the BSON type that was found.
        found: &'static str,
    },
    /// A patch targets a field the schema does not declare.
    Unknown,
    /// A patch targets the identity field.
    Immutable,
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The failure category.
    pub kind: FieldErrorKind,
    /// Human readable description.
    pub message: String,
}

impl FieldError {
    fn required(field: &str) -> Self {
        Self {
            kind: FieldErrorKind::Required,
            message: format!("{field} is required"),
        }
    }

    fn type_mismatch(field: &str, expected: FieldType, value: &Bson) -> Self {
        let found = bson_type_name(value);

        Self {
            kind: FieldErrorKind::TypeMismatch { expected, found },
            message: format!("{field} must be a {expected}, got {found}"),
        }
    }

    fn unknown(field: &str) -> Self {
        Self {
            kind: FieldErrorKind::Unknown,
            message: format!("{field} is not a known field"),
        }
    }

    fn immutable(field: &str) -> Self {
        Self {
            kind: FieldErrorKind::Immutable,
            message: format!("{field} cannot be modified"),
        }
    }
}

fn bson_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::String(_) => "string",
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => "number",
        Bson::Boolean(_) => "boolean",
        Bson::Document(_) => "object",
        Bson::Array(_) => "array",
        Bson::Null | Bson::Undefined => "null",
        Bson::DateTime(_) | Bson::Timestamp(_) => "date",
        Bson::Binary(_) => "binary",
        Bson::ObjectId(_) => "objectId",
        _ => "unsupported",
    }
}

/// All validation failures of one document or patch, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    fn insert(&mut self, field: String, error: FieldError) {
        self.errors.insert(field, error);
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Returns the error recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Returns true when `field` failed validation.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over failing fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors
            .iter()
            .map(|(field, error)| (field.as_str(), error))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.errors
            .values()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>();

        f.write_str(&messages.join(", "))
    }
}

/// Serializes as a `field -> message` map.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;

        for (field, error) in &self.errors {
            map.serialize_entry(field, &error.message)?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn person_schema() -> Schema {
        Schema::builder()
            .required("name", FieldType::String)
            .optional("nickname", FieldType::String)
            .optional("age", FieldType::Number)
            .build()
    }

    #[test]
    fn accepts_valid_document() {
        let schema = person_schema();

        assert!(schema.validate(&doc! { "name": "Ada", "age": 36 }).is_ok());
        assert!(schema.validate(&doc! { "name": "Ada", "nickname": null }).is_ok());
    }

    #[test]
    fn missing_null_and_empty_required_fields_are_required_errors() {
        let schema = person_schema();

        for document in [doc! {}, doc! { "name": null }, doc! { "name": "" }] {
            let errors = schema.validate(&document).unwrap_err();
            assert_eq!(errors.get("name").unwrap().kind, FieldErrorKind::Required);
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn wrong_types_are_type_mismatches() {
        let schema = person_schema();
        let errors = schema
            .validate(&doc! { "name": { "first": "Ada" }, "age": "old" })
            .unwrap_err();

        assert_eq!(
            errors.get("name").unwrap().kind,
            FieldErrorKind::TypeMismatch { expected: FieldType::String, found: "object" },
        );
        assert_eq!(
            errors.get("age").unwrap().kind,
            FieldErrorKind::TypeMismatch { expected: FieldType::Number, found: "string" },
        );
        assert!(!errors.contains("nickname"));
    }

    #[test]
    fn undeclared_fields_and_id_are_ignored_by_validate() {
        let schema = person_schema();

        assert!(schema.validate(&doc! { "name": "Ada", "id": 1, "extra": [1, 2] }).is_ok());
    }

    #[test]
    fn redeclaring_a_field_replaces_it() {
        let schema = Schema::builder()
            .required("name", FieldType::String)
            .optional("name", FieldType::Number)
            .build();

        assert_eq!(schema.fields().len(), 1);
        assert!(!schema.field("name").unwrap().required);
    }

    #[test]
    fn patch_validation() {
        let schema = person_schema();

        assert!(schema.validate_patch(&Patch::new().set("name", "Grace")).is_ok());

        let errors = schema
            .validate_patch(
                &Patch::new()
                    .set("name", "")
                    .set("id", 1)
                    .set("email", "a@b.c")
                    .set("age", true),
            )
            .unwrap_err();

        assert_eq!(errors.get("name").unwrap().kind, FieldErrorKind::Required);
        assert_eq!(errors.get("id").unwrap().kind, FieldErrorKind::Immutable);
        assert_eq!(errors.get("email").unwrap().kind, FieldErrorKind::Unknown);
        assert!(matches!(errors.get("age").unwrap().kind, FieldErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn empty_schema_accepts_any_patch_except_id() {
        let schema = Schema::default();

        assert!(schema.validate_patch(&Patch::new().set("anything", 1)).is_ok());
        assert!(schema.validate_patch(&Patch::new().set("id", 1)).is_err());
    }

    #[test]
    fn errors_serialize_as_field_message_map() {
        let errors = person_schema().validate(&doc! {}).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json, serde_json::json!({ "name": "name is required" }));
        assert_eq!(errors.to_string(), "name is required");
    }
}
