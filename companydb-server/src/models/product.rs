use bson::Uuid;
use companydb::prelude::*;
use serde::{Deserialize, Serialize};

/// A product sold to a client, stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub client: String,
}

impl Product {
    pub fn new(name: impl Into<String>, client: impl Into<String>) -> Self {
        Self {
            id: Uuid::new(),
            name: name.into(),
            client: client.into(),
        }
    }
}

impl Document for Product {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "products"
    }

    fn schema() -> Schema {
        Schema::builder()
            .required("name", FieldType::String)
            .required("client", FieldType::String)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn name_and_client_are_required_strings() {
        let errors = Product::schema()
            .validate(&doc! { "name": "", "client": ["Acme"] })
            .unwrap_err();

        assert_eq!(errors.get("name").map(|e| &e.kind), Some(&FieldErrorKind::Required));
        assert!(matches!(
            errors.get("client").map(|e| &e.kind),
            Some(FieldErrorKind::TypeMismatch { .. })
        ));
        assert!(Product::schema().validate(&doc! { "name": "Widget", "client": "Acme" }).is_ok());
    }
}
