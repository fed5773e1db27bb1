//! Field name escaping for MongoDB.
//!
//! MongoDB reserves `.` (path separator) and `$` (operator prefix) in field
//! names and rejects NUL bytes. Keys are escaped on the way in and restored
//! on the way out; values are stored untouched so filters compare them as-is.

use bson::{Bson, Document};


pub(crate) struct KeySanitizer;

impl KeySanitizer {
    const REPLACEMENTS: [(&'static str, &'static str); 3] = [
        (".", "__dot__"),
        ("$", "__dollar__"),
        ("\0", "__null__"),
    ];

    /// Escapes reserved characters in a field or collection name.
    pub(crate) fn sanitize_key(input: &str) -> String {
        Self::REPLACEMENTS
            .iter()
            .fold(input.to_string(), |key, (target, replacement)| key.replace(target, replacement))
    }

    /// Reverses [`sanitize_key`](Self::sanitize_key).
    pub(crate) fn restore_key(input: &str) -> String {
        Self::REPLACEMENTS
            .iter()
            .rev()
            .fold(input.to_string(), |key, (target, replacement)| key.replace(replacement, target))
    }

    /// Escapes every key of `document`, recursing into nested documents and arrays.
    pub(crate) fn sanitize_document(document: &Document) -> Document {
        Self::map_keys(document, Self::sanitize_key)
    }

    /// Restores every key of `document`, recursing into nested documents and arrays.
    pub(crate) fn restore_document(document: &Document) -> Document {
        Self::map_keys(document, Self::restore_key)
    }

    fn map_keys(document: &Document, rename: fn(&str) -> String) -> Document {
        document
            .iter()
            .map(|(key, value)| (rename(key), Self::map_value(value, rename)))
            .collect()
    }

    fn map_value(value: &Bson, rename: fn(&str) -> String) -> Bson {
        match value {
            Bson::Document(document) => Bson::Document(Self::map_keys(document, rename)),
            Bson::Array(items) => Bson::Array(
                items
                    .iter()
                    .map(|item| Self::map_value(item, rename))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}
