mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use companydb_server::models::Product;
use serde_json::json;

use common::{dispatch, send, test_app};

async fn seed(state: &companydb_server::AppState) -> Vec<Product> {
    let products = vec![
        Product::new("Widget", "Acme"),
        Product::new("Gadget", "Globex"),
    ];

    state.store
        .typed_collection::<Product>()
        .insert(products.clone())
        .await
        .unwrap();

    products
}

#[tokio::test]
async fn lists_all_products() {
    let (app, state) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    seed(&state).await;

    let (status, body) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Widget", "Gadget"]);
}

#[tokio::test]
async fn random_product_comes_from_the_collection() {
    let (app, state) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/products/random", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));

    let seeded = seed(&state).await;

    for _ in 0..10 {
        let (status, body) = send(&app, Method::GET, "/products/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(seeded.iter().any(|p| p.name == body["name"]));
    }
}

#[tokio::test]
async fn gets_product_by_id() {
    let (app, state) = test_app().await;
    let seeded = seed(&state).await;

    let (status, body) = send(&app, Method::GET, &format!("/products/{}", seeded[1].id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Gadget");
    assert_eq!(body["client"], "Globex");
    assert_eq!(body["id"], seeded[1].id.to_string());

    let (status, _) = send(&app, Method::GET, "/products/67e55044-10b1-426f-9247-bb680e5fe0c8", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/products/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn creates_a_product() {
    let (app, state) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({ "name": "Widget", "client": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Widget");
    assert!(body["id"].is_string());

    let stored = state.store
        .typed_collection::<Product>()
        .find(None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id.to_string(), body["id"].as_str().unwrap());
}

#[tokio::test]
async fn rejects_invalid_products() {
    let (app, state) = test_app().await;

    let (status, body) = send(&app, Method::POST, "/products", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["name"], "name is required");
    assert_eq!(body["errors"]["client"], "client is required");

    let (status, body) = send(&app, Method::POST, "/products", Some(json!({ "name": {}, "client": "Acme" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["name"].is_string());
    assert!(body["errors"].get("client").is_none());

    let (status, _) = send(&app, Method::POST, "/products", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(state.store.typed_collection::<Product>().count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn rejects_numbers_bson_cannot_hold() {
    let (app, state) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({ "name": "a", "client": "b", "qty": 18446744073709551615u64 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    assert_eq!(state.store.typed_collection::<Product>().count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn unreadable_bodies_answer_with_a_message() {
    let (app, state) = test_app().await;

    let without_content_type = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .body(Body::from(r#"{"name":"Widget","client":"Acme"}"#))
        .unwrap();
    let (status, body) = dispatch(&app, without_content_type).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["message"].is_string());

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Widget","#))
        .unwrap();
    let (status, body) = dispatch(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    assert_eq!(state.store.typed_collection::<Product>().count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn replaces_a_product() {
    let (app, state) = test_app().await;
    let seeded = seed(&state).await;
    let uri = format!("/products/{}", seeded[0].id);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Widget 2", "client": "Initech" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget 2");
    assert_eq!(body["id"], seeded[0].id.to_string());

    let stored = state.store
        .typed_collection::<Product>()
        .find_by_id(seeded[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.client, "Initech");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Widget 3" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/products/67e55044-10b1-426f-9247-bb680e5fe0c8",
        Some(json!({ "name": "Ghost", "client": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deletes_a_product() {
    let (app, state) = test_app().await;
    let seeded = seed(&state).await;
    let uri = format!("/products/{}", seeded[0].id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "OK" }));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = state.store
        .typed_collection::<Product>()
        .find(None)
        .await
        .unwrap();
    assert_eq!(remaining, vec![seeded[1].clone()]);
}
