mod common;

use std::time::Duration;

use common::{product_json, setup, setup_with_timeout};
use serde_json::json;
use storefront_client::storage::TokenStorage;
use storefront_client::Error;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    ctx.storage.set_item("token", "abc123").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .and(header("Authorization", "Bearer abc123"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(1, 25)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let product = ctx.storefront.products().get(1).await.unwrap();
    assert_eq!(product.id, 1);
    assert!(product.in_stock());
}

#[tokio::test]
async fn test_session_marker_is_not_sent_as_bearer() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    ctx.storage.set_item("token", "oauth2-session").unwrap();

    Mock::given(method("GET"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Mugs", "Shirts"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let categories = ctx.storefront.products().categories().await.unwrap();
    assert_eq!(categories, vec!["Mugs", "Shirts"]);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_unauthorized_clears_credentials_and_redirects_once() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    ctx.storage.set_item("token", "expired").unwrap();
    ctx.storage.set_item("userId", "7").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/orders/1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Session expired"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = ctx.storefront.orders().get(1).await;

    match result {
        Err(Error::Unauthorized(message)) => assert_eq!(message, "Session expired"),
        other => panic!("expected unauthorized, got {:?}", other),
    }
    assert_eq!(ctx.storage.get_item("token"), None);
    assert_eq!(ctx.storage.get_item("userId"), None);
    assert_eq!(ctx.navigator.routes(), vec!["/login"]);
}

#[tokio::test]
async fn test_api_error_carries_server_message() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/products/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "message": "Product not found with id: 99"
        })))
        .mount(&mock_server)
        .await;

    let err = ctx.storefront.products().get(99).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        Error::Api { message, details, .. } => {
            assert_eq!(message, "Product not found with id: 99");
            assert!(details.is_some());
        }
        other => panic!("expected api error, got {:?}", other),
    }
    assert!(ctx.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_authorization_url_uses_api_origin() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    let url = ctx
        .storefront
        .auth()
        .authorization_url(storefront_client::auth::OAuthProvider::Google)
        .unwrap();

    assert_eq!(url, format!("{}/oauth2/authorization/google", mock_server.uri()));
}

#[tokio::test]
async fn test_request_timeout_is_enforced() {
    let mock_server = MockServer::start().await;
    let ctx = setup_with_timeout(&mock_server, Duration::from_millis(200));

    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_json(1, 25))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let result = ctx.storefront.products().get(1).await;

    assert!(matches!(&result, Err(err) if err.is_timeout()), "got {:?}", result);
    assert_eq!(result.unwrap_err().status(), None);
    assert!(ctx.navigator.routes().is_empty());
}
