//! Product API

use axum::{Router, routing::get};

use crate::{api::resource, models::Product, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(resource::list::<Product>).post(resource::create::<Product>),
        )
        .route("/products/random", get(resource::random::<Product>))
        .route(
            "/products/{id}",
            get(resource::get_by_id::<Product>)
                .put(resource::update::<Product>)
                .delete(resource::delete::<Product>),
        )
}
