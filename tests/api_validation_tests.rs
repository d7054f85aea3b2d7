// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation tests. Invalid input must be rejected before any
//! upstream call is made.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn server_expecting_no_calls(path: &str) -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path)
        .expect(0)
        .create_async()
        .await;
    (server, mock)
}

#[tokio::test]
async fn test_invalid_card_rejected_locally() {
    let (server, guard) = server_expecting_no_calls("/api/Buy/Pay").await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::anonymous(
            "POST",
            "/api/payments/pay",
            Some(json!({
                "orderId": "ord-1",
                "cardNumber": "4111 1111 1111",
                "expiry": "01/20",
                "cvv": "12"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::json_body(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Номер картки має містити 16 цифр"));
    assert!(message.contains("CVV має містити 3 цифри"));
    assert!(message.contains("Термін дії картки минув"));
    guard.assert_async().await;
}

#[tokio::test]
async fn test_valid_card_sent_without_spaces() {
    let mut server = mockito::Server::new_async().await;
    let pay = server
        .mock("POST", "/api/Buy/Pay")
        .match_body(mockito::Matcher::PartialJson(json!({
            "orderId": "ord-1",
            "cardNumber": "4111111111111111"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "paid"}"#)
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::anonymous(
            "POST",
            "/api/payments/pay",
            Some(json!({
                "orderId": "ord-1",
                "cardNumber": "4111 1111 1111 1111",
                "expiry": "12/99",
                "cvv": "123"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    pay.assert_async().await;
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/orders/unregistered")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::json_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_guest_order_requires_items_and_contact() {
    let (server, guard) = server_expecting_no_calls("/api/Order/BuyUnRegistered").await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::anonymous(
            "POST",
            "/api/orders/unregistered",
            Some(json!({
                "fullName": "І",
                "phone": "123",
                "email": "nope",
                "items": []
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    guard.assert_async().await;
}

#[tokio::test]
async fn test_guest_order_forwards_delivery_fields() {
    let mut server = mockito::Server::new_async().await;
    let order = server
        .mock("POST", "/api/Order/BuyUnRegistered")
        .match_body(mockito::Matcher::PartialJson(json!({
            "city": "Київ",
            "items": [{"productId": "p1", "quantity": 2}]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"orderId": "ord-5"}"#)
        .create_async()
        .await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::anonymous(
            "POST",
            "/api/orders/unregistered",
            Some(json!({
                "fullName": "Іван Петренко",
                "phone": "+380501234567",
                "email": "ivan@example.com",
                "city": "Київ",
                "items": [{"productId": "p1", "quantity": 2}]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::json_body(response).await["orderId"], "ord-5");
    order.assert_async().await;
}

#[tokio::test]
async fn test_review_rating_out_of_range() {
    let (server, guard) = server_expecting_no_calls("/api/ProductReview/create").await;
    let (app, _state) = common::create_test_app_with_upstream(&server.url());

    let response = app
        .oneshot(common::authed(
            "POST",
            "/api/reviews",
            Some(json!({"productId": "42", "rating": 9, "comment": "?"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    guard.assert_async().await;
}

#[tokio::test]
async fn test_too_many_media_ids() {
    let (app, _state) = common::create_test_app();
    let ids: Vec<String> = (0..51).map(|i| i.to_string()).collect();

    let response = app
        .oneshot(common::get(&format!("/api/media/many?ids={}", ids.join(","))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_query_too_long() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(common::get(&format!(
            "/api/categories/search?q={}",
            "a".repeat(101)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
