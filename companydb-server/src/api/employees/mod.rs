//! Employee API

mod handler;

use axum::{Router, routing::get};

use crate::{api::resource, models::Employee, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/employees",
            get(handler::list).post(resource::create::<Employee>),
        )
        .route("/employees/random", get(resource::random::<Employee>))
        .route(
            "/employees/{id}",
            get(resource::get_by_id::<Employee>)
                .put(resource::update::<Employee>)
                .delete(resource::delete::<Employee>),
        )
}
