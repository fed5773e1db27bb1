use bson::Uuid;
use companydb::prelude::*;
use serde::{Deserialize, Serialize};

/// A company employee, stored in the `employees` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Employee {
    /// Creates an unsaved employee with a fresh identity.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            department,
        }
    }
}

impl Document for Employee {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "employees"
    }

    fn schema() -> Schema {
        Schema::builder()
            .required("firstName", FieldType::String)
            .required("lastName", FieldType::String)
            .optional("department", FieldType::String)
            .build()
    }
}
