// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites route tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

fn bearer() -> String {
    format!("Bearer {}", common::TEST_TOKEN)
}

#[tokio::test]
async fn test_lists_are_typed_and_ids_stringified() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Favorite/my-lists")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": 1, "userId": 9, "name": "Товари", "products": [10, "11"]},
                {"id": "2", "name": "Подарунки"}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::authed("GET", "/api/favorites/lists", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body[0]["products"], json!(["10", "11"]));
    assert_eq!(body[1]["products"], json!([]));
}

#[tokio::test]
async fn test_no_lists_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Favorite/my-lists")
        .with_status(204)
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::authed("GET", "/api/favorites/lists", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_add_to_default_forwards_product() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/Favorite/add-to-default")
        .match_header("authorization", bearer().as_str())
        .match_body(mockito::Matcher::Json(json!({"productId": "42"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::authed(
            "POST",
            "/api/favorites/default",
            Some(json!({"productId": "42"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remove_product_from_list() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/Favorite/3/remove-product/42")
        .with_status(204)
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::authed(
            "DELETE",
            "/api/favorites/lists/3/products/42",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_name_length_checked() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(common::authed(
            "POST",
            "/api/favorites/lists",
            Some(json!({"name": "   "})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrapped_lists_are_unwrapped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Favorite/my-lists")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"lists": [{"id": 4, "name": "Кухня", "products": [7]}]}).to_string())
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::authed("GET", "/api/favorites/lists", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body[0]["id"], "4");
    assert_eq!(body[0]["products"], json!(["7"]));
}
