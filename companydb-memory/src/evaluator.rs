//! Filter evaluation against stored BSON documents.

use std::{cmp::Ordering, collections::HashMap};
use bson::{Bson, Document, datetime::DateTime};

use companydb_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, FieldOp, QueryVisitor},
};


/// Comparable view of a BSON value. Integers and doubles compare as `f64`.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    /// Raw bytes of binary values, UUIDs included.
    Bytes(&'a [u8]),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Binary(binary) => Comparable::Bytes(&binary.bytes),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Null,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Bytes(a), Comparable::Bytes(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<'a> Comparable<'a> {
    /// Reads `field` of a stored document, treating a missing field or a
    /// non-document value as null.
    pub(crate) fn field(document: &'a Bson, field: &str) -> Self {
        document
            .as_document()
            .and_then(|doc| doc.get(field))
            .map(Comparable::from)
            .unwrap_or(Comparable::Null)
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: Option<&'a Document>,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document: document.as_document() }
    }

    /// Returns true when `document` satisfies `filter`. No filter matches everything.
    pub fn matches(document: &'a Bson, filter: Option<&Expr>) -> DocumentStoreResult<bool> {
        match filter {
            Some(expr) => DocumentEvaluator::new(document).visit_expr(expr),
            None => Ok(true),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Bson> {
        self.document.and_then(|doc| doc.get(field))
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(self.get(field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let equal = self
            .get(field)
            .is_some_and(|field_value| Comparable::from(field_value) == Comparable::from(value));

        Ok(match op {
            FieldOp::Eq => equal,
            FieldOp::Ne => !equal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Uuid, doc};
    use companydb_core::query::Filter;

    fn employee() -> Bson {
        Bson::Document(doc! {
            "firstName": "Test firstName One",
            "lastName": "Test lastName One",
            "department": "Test Department One",
            "skills": ["rust", "sql"],
            "age": 41,
        })
    }

    fn eval(expr: Expr) -> bool {
        DocumentEvaluator::matches(&employee(), Some(&expr)).unwrap()
    }

    #[test]
    fn equality_and_negation() {
        assert!(eval(Filter::eq("firstName", "Test firstName One")));
        assert!(!eval(Filter::eq("firstName", "Test firstName Two")));
        assert!(eval(Filter::ne("firstName", "Test firstName Two")));
        assert!(eval(Filter::ne("missing", "anything")));
        assert!(!eval(Filter::eq("missing", "anything")));
    }

    #[test]
    fn numbers_and_arrays_compare_by_value() {
        assert!(eval(Filter::eq("age", 41.0)));
        assert!(eval(Filter::eq("age", 41_i64)));
        assert!(!eval(Filter::eq("age", "41")));
        assert!(eval(Filter::eq("skills", vec!["rust", "sql"])));
        assert!(!eval(Filter::eq("skills", vec!["sql", "rust"])));
    }

    #[test]
    fn logical_combinators() {
        assert!(eval(Filter::eq("firstName", "Test firstName One").and(Filter::exists("lastName"))));
        assert!(eval(Filter::eq("firstName", "nope").or(Filter::not_exists("email"))));
        assert!(!eval(Filter::exists("department").not()));
        assert!(DocumentEvaluator::matches(&employee(), None).unwrap());
    }

    #[test]
    fn uuids_match_by_value() {
        let id = Uuid::new();
        let document = Bson::Document(doc! { "id": id });

        assert!(DocumentEvaluator::matches(&document, Some(&Filter::id(id))).unwrap());
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::id(Uuid::new()))).unwrap());
    }
}
