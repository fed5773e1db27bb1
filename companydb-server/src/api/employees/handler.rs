//! Employee API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use companydb::prelude::Filter;

use crate::{error::AppResult, models::Employee, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub department: Option<String>,
}

/// GET /employees?department=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Employee>>> {
    let filter = params
        .department
        .map(|department| Filter::eq("department", department));

    let employees = state.store
        .typed_collection::<Employee>()
        .find(filter)
        .await?;

    Ok(Json(employees))
}
