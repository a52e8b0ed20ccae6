//! Integration tests for request building and error classification against
//! a real HTTP server.
//!
//! Each test starts an axum router on an ephemeral loopback port and points
//! an `ApiClient` at it.

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bookit_api::{ApiClient, ApiErrorKind, FavoritesApi, SupplierQuery};
use bookit_core::{CardDetails, LoginRequest, OrderStatus};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Serves `router` on 127.0.0.1 and returns a client for it.
async fn serve(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base = Url::parse(&format!("http://{addr}/api")).unwrap();
    ApiClient::with_base_url(base, Duration::from_secs(5)).unwrap()
}

fn user_json() -> Value {
    json!({"id": "u-1", "email": "ada@example.com", "name": "Ada"})
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let router = Router::new().route(
        "/api/auth/login",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["email"], "ada@example.com");
            Json(json!({"token": "tok-1", "user": user_json()}))
        }),
    );
    let api = serve(router).await;

    let response = api
        .auth()
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.token, "tok-1");
    assert_eq!(response.user.name, "Ada");
}

#[tokio::test]
async fn test_invalid_login_never_hits_network() {
    // No routes: any request would 404.
    let api = serve(Router::new()).await;

    let err = api
        .auth()
        .login(&LoginRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Validation);
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let router = Router::new().route(
        "/api/auth/me",
        get(|headers: HeaderMap| async move {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer tok-9") => Ok(Json(user_json())),
                _ => Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "Session expired"})))),
            }
        }),
    );
    let api = serve(router).await;

    let err = api.auth().me().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Session expired");

    api.set_token("tok-9").await;
    assert_eq!(api.auth().me().await.unwrap().id, "u-1");
}

#[tokio::test]
async fn test_status_classification_end_to_end() {
    let router = Router::new().route(
        "/api/status/{code}",
        get(|Path(code): Path<u16>| async move {
            let status = StatusCode::from_u16(code).unwrap();
            (status, Json(json!({"message": format!("status {code}"), "code": "E_TEST"})))
        }),
    );
    let api = serve(router).await;

    let cases = [
        (400, ApiErrorKind::Validation, true),
        (401, ApiErrorKind::Unauthorized, true),
        (403, ApiErrorKind::Forbidden, true),
        (404, ApiErrorKind::NotFound, true),
        (409, ApiErrorKind::Conflict, true),
        (422, ApiErrorKind::Validation, true),
        (429, ApiErrorKind::RateLimited, true),
        (500, ApiErrorKind::Server, false),
        (503, ApiErrorKind::Server, false),
    ];

    for (code, kind, expected) in cases {
        let err = api
            .get::<Value>(&["status", &code.to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.kind, kind, "status {code}");
        assert_eq!(err.status, Some(code));
        assert_eq!(err.code.as_deref(), Some("E_TEST"));
        assert_eq!(err.is_expected(), expected, "status {code}");
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let router = Router::new().route("/api/categories", get(|| async { "not json" }));
    let api = serve(router).await;

    let err = api.categories().list().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
    assert!(!err.is_expected());
}

#[tokio::test]
async fn test_enveloped_list_and_query_string() {
    let router = Router::new().route(
        "/api/suppliers",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("category").map(String::as_str), Some("cleaning"));
            assert_eq!(params.get("search").map(String::as_str), Some("sparkle"));
            assert_eq!(params.get("perPage").map(String::as_str), Some("20"));
            Json(json!({"data": [{
                "id": "s-1",
                "name": "Sparkle Cleaners",
                "categoryId": "cleaning",
                "rating": 4.5,
                "reviewCount": 12,
                "verified": true
            }]}))
        }),
    );
    let api = serve(router).await;

    let suppliers = api
        .suppliers()
        .list(&SupplierQuery::in_category("cleaning").search(" sparkle "))
        .await
        .unwrap();

    assert_eq!(suppliers.len(), 1);
    assert!(suppliers[0].verified);
}

#[tokio::test]
async fn test_order_status_filter() {
    let router = Router::new().route(
        "/api/orders",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("status").map(String::as_str), Some("in_progress"));
            Json(json!([]))
        }),
    );
    let api = serve(router).await;

    let orders = api.orders().list(Some(OrderStatus::InProgress)).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_favorites_conflict_and_not_found() {
    let router = Router::new()
        .route(
            "/api/favorites",
            post(|| async { (StatusCode::CONFLICT, Json(json!({"message": "Already a favorite"}))) }),
        )
        .route(
            "/api/favorites/{id}",
            delete(|Path(id): Path<String>| async move {
                if id == "s-1" {
                    StatusCode::NO_CONTENT
                } else {
                    StatusCode::NOT_FOUND
                }
            }),
        )
        .route("/api/favorites/ids", get(|| async { Json(json!(["s-1", "s-2"])) }));
    let api = serve(router).await;
    let favorites = api.favorites();

    assert!(favorites.add("s-1").await.unwrap_err().is_conflict());
    assert!(favorites.remove("s-1").await.is_ok());
    assert!(favorites.remove("s-404").await.unwrap_err().is_not_found());
    assert_eq!(favorites.list_ids().await.unwrap(), vec!["s-1", "s-2"]);
}

#[tokio::test]
async fn test_payment_sends_clean_card_number() {
    let router = Router::new().route(
        "/api/orders/{id}/payments",
        post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            assert_eq!(body["cardNumber"], "4242424242424242");
            Json(json!({
                "id": "p-1",
                "orderId": id,
                "amountCents": 10822,
                "status": "succeeded",
                "cardBrand": "visa",
                "cardLast4": "4242",
                "createdAt": "2025-06-01T10:00:00Z"
            }))
        }),
    );
    let api = serve(router).await;

    let card = CardDetails {
        number: "4242 4242 4242 4242".to_string(),
        expiry: "12/99".to_string(),
        cvv: "123".to_string(),
        holder_name: "Ada Lovelace".to_string(),
    };
    let payment = api.payments().pay("o-1", &card).await.unwrap();
    assert_eq!(payment.order_id, "o-1");
    assert_eq!(payment.amount().to_string(), "$108.22");

    let bad_card = CardDetails {
        number: "4242 4242 4242 4241".to_string(),
        ..card
    };
    let err = api.payments().pay("o-1", &bad_card).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Validation);
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_send_message_carries_client_id() {
    let router = Router::new().route(
        "/api/conversations/{id}/messages",
        post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            let client_id = body["clientMessageId"].as_str().unwrap().to_string();
            assert_eq!(client_id.len(), 36);
            Json(json!({
                "id": "m-1",
                "conversationId": id,
                "sender": "user",
                "body": body["body"],
                "createdAt": "2025-06-01T10:00:00Z",
                "clientMessageId": client_id
            }))
        }),
    );
    let api = serve(router).await;

    let message = api.conversations().send("c-1", "  On my way  ").await.unwrap();
    assert_eq!(message.body, "On my way");
    assert!(message.client_message_id.is_some());

    let err = api.conversations().send("c-1", "   ").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Validation);
}

#[tokio::test]
async fn test_unread_count() {
    let router = Router::new().route(
        "/api/conversations/unread-count",
        get(|| async { Json(json!({"count": 7})) }),
    );
    let api = serve(router).await;

    assert_eq!(api.conversations().unread_count().await.unwrap(), 7);
}
