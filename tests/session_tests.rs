mod common;

use common::{setup, user, user_json};
use serde_json::json;
use storefront_client::auth::UserUpdate;
use storefront_client::storage::TokenStorage;
use storefront_client::store::SessionState;
use storefront_client::Error;
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_init_resolves_current_session_once() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/auth/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = ctx.storefront.session();
    assert_eq!(session.init().await, Some(user(1)));
    assert_eq!(session.init().await, Some(user(1)));

    let state = session.state();
    assert_eq!(state.user, Some(user(1)));
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_init_failure_is_anonymous_not_an_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/auth/user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("no session"))
        .mount(&mock_server)
        .await;

    let session = ctx.storefront.session();
    assert_eq!(session.init().await, None);

    let state = session.state();
    assert_eq!(state.user, None);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_login_with_session_failure_records_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/5"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})),
        )
        .mount(&mock_server)
        .await;

    let session = ctx.storefront.session();
    let err = assert_err!(session.login_with_session(5, "user5@example.com").await);
    assert_eq!(err.status(), Some(404));

    let state = session.state();
    assert_eq!(state.user, None);
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("User not found"));
}

#[tokio::test]
async fn test_login_persists_token_and_user_id() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    let session = ctx.storefront.session();
    let signed_in = assert_ok!(session.login("tok-1", user(3)));

    assert_eq!(signed_in, user(3));
    assert_eq!(session.user(), Some(user(3)));
    assert_eq!(ctx.storage.get_item("token").as_deref(), Some("tok-1"));
    assert_eq!(ctx.storage.get_item("userId").as_deref(), Some("3"));
}

#[tokio::test]
async fn test_logout_resets_even_when_server_fails() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = ctx.storefront.session();
    session.login("tok-1", user(3)).unwrap();
    let signed_in_epoch = session.epoch();
    session.logout().await;

    let state = session.state();
    assert_eq!(
        state,
        SessionState {
            epoch: signed_in_epoch + 1,
            ..SessionState::default()
        }
    );
    assert_eq!(ctx.storage.get_item("token"), None);
    assert_eq!(ctx.storage.get_item("userId"), None);
    assert_eq!(ctx.navigator.routes(), vec!["/"]);
}

#[tokio::test]
async fn test_update_user_adopts_server_profile() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    let mut stored = user_json(3);
    stored["name"] = json!("Grace Hopper");
    stored["imageUrl"] = json!("https://cdn.example.com/grace.png");

    Mock::given(method("PUT"))
        .and(path("/api/auth/user/3"))
        .and(body_partial_json(json!({"name": "Grace", "email": "user3@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = ctx.storefront.session();
    session.login("oauth2-session", user(3)).unwrap();

    let update = UserUpdate {
        name: Some("Grace".to_string()),
        ..Default::default()
    };
    let updated = session.update_user(&update).await.unwrap();

    assert_eq!(updated.name, "Grace Hopper");
    assert_eq!(
        updated.picture_url.as_deref(),
        Some("https://cdn.example.com/grace.png")
    );
    assert_eq!(session.user(), Some(updated));
}

#[tokio::test]
async fn test_update_user_requires_session() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    let result = ctx
        .storefront
        .session()
        .update_user(&UserUpdate::default())
        .await;

    assert!(matches!(result, Err(Error::Ownership(_))));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oauth_callback_signs_in() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = Url::parse("http://localhost:3000/login?userId=4&email=user4%40example.com").unwrap();
    let session = ctx.storefront.session();

    let signed_in = session.handle_oauth_callback(&url).await.unwrap();
    assert_eq!(signed_in, Some(user(4)));
    assert_eq!(session.user(), Some(user(4)));
}

#[tokio::test]
async fn test_oauth_callback_error_and_plain_url() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    let session = ctx.storefront.session();

    let failed = Url::parse("http://localhost:3000/login?error=access_denied").unwrap();
    match session.handle_oauth_callback(&failed).await {
        Err(Error::Auth(message)) => assert_eq!(message, "Login failed: access_denied"),
        other => panic!("expected auth error, got {:?}", other),
    }

    let plain = Url::parse("http://localhost:3000/login").unwrap();
    assert_eq!(session.handle_oauth_callback(&plain).await.unwrap(), None);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
