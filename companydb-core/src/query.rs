//! Filters and queries over stored documents.
//!
//! Filters are expression trees ([`Expr`]) evaluated by each backend through
//! the [`QueryVisitor`] trait. The [`Filter`] helper builds the common cases:
//!
//! ```ignore
//! use companydb::prelude::*;
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("department", "IT").and(Filter::exists("lastName")))
//!     .sort("lastName", SortDirection::Asc)
//!     .limit(10)
//!     .build();
//! ```
//!
//! Mongo-style equality documents convert directly:
//!
//! ```ignore
//! let filter = Filter::from_document(doc! { "firstName": "Test firstName One" });
//! ```

use bson::{Bson, Document as BsonDocument, Uuid};

use crate::{document::ID_FIELD, error::DocumentStoreError};

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Field and direction to order results by.
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Whether a filtered write touches the first match or every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    One,
    Many,
}

/// Field comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Eq,
    /// Also matches documents that lack the field.
    Ne,
}

/// A filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Every sub-expression matches.
    And(Vec<Expr>),
    /// At least one sub-expression matches.
    Or(Vec<Expr>),
    Not(Box<Expr>),
    /// The field is present (`true`) or absent (`false`).
    Exists(String, bool),
    Field {
        field: String,
        op: FieldOp,
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines with `other` using logical AND, flattening nested ANDs.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines with `other` using logical OR, flattening nested ORs.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// A filter plus ordering and windowing.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Documents to select; `None` selects everything.
    pub filter: Option<Expr>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<Sort>,
}

impl Query {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Constructors for filter expressions.
pub struct Filter;

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    pub fn exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), true)
    }

    pub fn not_exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), false)
    }

    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }

    /// Matches the document whose identity is `id`.
    pub fn id(id: Uuid) -> Expr {
        Filter::eq(ID_FIELD, id)
    }

    /// Converts a `field: value` equality document into a filter.
    ///
    /// An empty document selects every document and yields `None`; a single
    /// pair yields a plain equality.
    pub fn from_document(document: BsonDocument) -> Option<Expr> {
        let mut exprs = document
            .into_iter()
            .map(|(field, value)| Filter::eq(field, value))
            .collect::<Vec<_>>();

        match exprs.len() {
            0 => None,
            1 => exprs.pop(),
            _ => Some(Expr::And(exprs)),
        }
    }
}

/// Fluent builder for [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<Option<Expr>>) -> Self {
        self.query.filter = filter.into();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks an [`Expr`] tree; implemented by each backend to evaluate or
/// translate filters.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn from_document_builds_equalities() {
        assert_eq!(Filter::from_document(doc! {}), None);
        assert_eq!(
            Filter::from_document(doc! { "firstName": "Ann" }),
            Some(Filter::eq("firstName", "Ann")),
        );
        assert_eq!(
            Filter::from_document(doc! { "firstName": "Ann", "lastName": "Lee" }),
            Some(Expr::And(vec![
                Filter::eq("firstName", "Ann"),
                Filter::eq("lastName", "Lee"),
            ])),
        );
    }

    #[test]
    fn and_or_flatten() {
        let expr = Filter::eq("a", 1)
            .and(Filter::eq("b", 2))
            .and(Filter::eq("c", 3));
        assert!(matches!(expr, Expr::And(ref list) if list.len() == 3));

        let expr = Filter::eq("a", 1)
            .or(Filter::eq("b", 2))
            .or(Filter::eq("c", 3));
        assert!(matches!(expr, Expr::Or(ref list) if list.len() == 3));
    }

    #[test]
    fn builder_accepts_optional_filter() {
        let query = Query::builder()
            .filter(None)
            .limit(1)
            .offset(2)
            .build();

        assert!(query.filter.is_none());
        assert_eq!(query.limit, Some(1));
        assert_eq!(query.offset, Some(2));

        let query = Query::builder()
            .filter(Filter::exists("name"))
            .build();
        assert_eq!(query.filter, Some(Expr::Exists("name".into(), true)));
    }
}
