use std::{
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{Json, Router, routing::post};
use serde_json::json;
use spotoken::config::{Config, DEFAULT_REDIRECT_URI};
use spotoken::error::AuthError;
use spotoken::spotify::auth::*;

fn test_config() -> Config {
    Config::new("X", "secret")
}

#[test]
fn test_authorization_url_contains_required_params() {
    let url = authorization_url(&test_config(), false).unwrap();

    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=X"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fcallback"));
    assert!(url.contains("scope=user-read-playback-state+user-modify-playback-state"));
    assert!(!url.contains("show_dialog"));
    assert!(!url.contains("secret"));
}

#[test]
fn test_authorization_url_is_deterministic() {
    let config = test_config();
    let first = authorization_url(&config, false).unwrap();
    let second = authorization_url(&config, false).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_authorization_url_normalizes_scope() {
    let mut config = test_config();
    config.scope = "user-read-private user-read-email \n                    user-read-playback-state \n  user-modify-playback-state".to_string();

    let url = authorization_url(&config, false).unwrap();
    assert!(url.ends_with(
        "scope=user-read-private+user-read-email+user-read-playback-state+user-modify-playback-state"
    ));
}

#[test]
fn test_authorization_url_show_dialog() {
    let url = authorization_url(&test_config(), true).unwrap();
    assert!(url.ends_with("&show_dialog=true"));
}

#[test]
fn test_authorization_url_rejects_invalid_endpoint() {
    let mut config = test_config();
    config.auth_url = "not a url".to_string();

    let err = authorization_url(&config, false).unwrap_err();
    assert!(matches!(err, AuthError::InvalidConfig { .. }));
}

#[test]
fn test_extract_code() {
    let code = extract_code("http://localhost:8888/callback?code=ABC123&state=xyz").unwrap();
    assert_eq!(code, "ABC123");
}

#[test]
fn test_extract_code_decodes_value() {
    let code = extract_code("http://localhost:8888/callback?code=AQ%2Bb-c_d").unwrap();
    assert_eq!(code, "AQ+b-c_d");
}

#[test]
fn test_extract_code_trims_whitespace() {
    let code = extract_code("  http://localhost:8888/callback?code=ABC123\n").unwrap();
    assert_eq!(code, "ABC123");
}

#[test]
fn test_extract_code_missing() {
    let err = extract_code("http://localhost:8888/callback?state=xyz").unwrap_err();
    assert!(matches!(err, AuthError::MissingAuthorizationCode));

    let err = extract_code(DEFAULT_REDIRECT_URI).unwrap_err();
    assert!(matches!(err, AuthError::MissingAuthorizationCode));
}

#[test]
fn test_extract_code_empty_value() {
    let err = extract_code("http://localhost:8888/callback?code=&state=xyz").unwrap_err();
    assert!(matches!(err, AuthError::MissingAuthorizationCode));
}

#[test]
fn test_extract_code_duplicate() {
    let err = extract_code("http://localhost:8888/callback?code=A&code=B").unwrap_err();
    assert!(matches!(err, AuthError::AmbiguousAuthorizationCode));
}

#[test]
fn test_extract_code_access_denied() {
    let err = extract_code("http://localhost:8888/callback?error=access_denied&state=xyz")
        .unwrap_err();
    match err {
        AuthError::AuthorizationDenied(reason) => assert_eq!(reason, "access_denied"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_extract_code_invalid_url() {
    let err = extract_code("code=ABC123").unwrap_err();
    assert!(matches!(err, AuthError::InvalidRedirectUrl(_)));
}

#[test]
fn test_prompt_redirect_url_reads_one_line() {
    let input = Cursor::new("http://localhost:8888/callback?code=ABC123\nignored\n");
    let mut output = Vec::new();

    let url = prompt_redirect_url(input, &mut output).unwrap();
    assert_eq!(url, "http://localhost:8888/callback?code=ABC123");

    let shown = String::from_utf8(output).unwrap();
    assert!(shown.contains("Paste the redirected URL here: "));
}

#[test]
fn test_prompt_redirect_url_empty_input() {
    let err = prompt_redirect_url(Cursor::new(""), std::io::sink()).unwrap_err();
    assert!(matches!(err, AuthError::EmptyInput));

    let err = prompt_redirect_url(Cursor::new("   \n"), std::io::sink()).unwrap_err();
    assert!(matches!(err, AuthError::EmptyInput));
}

#[test]
fn test_parse_token_response_success() {
    let tokens = parse_token_response(
        200,
        r#"{"access_token":"AT1","token_type":"Bearer","scope":"user-read-email","expires_in":3600,"refresh_token":"RT1"}"#,
    )
    .unwrap();

    assert_eq!(
        (tokens.access_token.as_str(), tokens.refresh_token.as_str()),
        ("AT1", "RT1")
    );
    assert_eq!(tokens.token_type.as_deref(), Some("Bearer"));
    assert_eq!(tokens.expires_in, Some(3600));
}

#[test]
fn test_parse_token_response_error() {
    let err = parse_token_response(400, r#"{"error":"invalid_grant"}"#).unwrap_err();
    match err {
        AuthError::TokenExchange { error, description } => {
            assert_eq!(error, "invalid_grant");
            assert!(description.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_token_response_missing_refresh_token() {
    let err = parse_token_response(200, r#"{"access_token":"AT1"}"#).unwrap_err();
    assert!(matches!(err, AuthError::MalformedTokenResponse(_)));
}

#[test]
fn test_parse_token_response_not_json() {
    let err = parse_token_response(502, "<html>Bad Gateway</html>").unwrap_err();
    match err {
        AuthError::MalformedTokenResponse(msg) => assert!(msg.starts_with("HTTP 502")),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Token endpoint that counts how often it is called.
async fn start_counting_token_endpoint(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new().route(
        "/api/token",
        post(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "access_token": "AT1",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                    "refresh_token": "RT1"
                }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/token")
}

fn paste_options() -> AuthOptions {
    AuthOptions {
        no_browser: true,
        ..AuthOptions::default()
    }
}

#[tokio::test]
async fn test_authorize_without_code_skips_token_exchange() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut config = test_config();
    config.token_url = start_counting_token_endpoint(Arc::clone(&hits)).await;

    let input = Cursor::new("http://localhost:8888/callback?state=xyz\n");
    let err = authorize_with(&config, &paste_options(), input, std::io::sink())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MissingAuthorizationCode));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_authorize_with_code_returns_tokens() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut config = test_config();
    config.token_url = start_counting_token_endpoint(Arc::clone(&hits)).await;

    let input = Cursor::new("http://localhost:8888/callback?code=ABC123&state=xyz\n");
    let tokens = authorize_with(&config, &paste_options(), input, std::io::sink())
        .await
        .unwrap();

    assert_eq!(
        (tokens.access_token.as_str(), tokens.refresh_token.as_str()),
        ("AT1", "RT1")
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_authorize_empty_paste_skips_token_exchange() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut config = test_config();
    config.token_url = start_counting_token_endpoint(Arc::clone(&hits)).await;

    let err = authorize_with(&config, &paste_options(), Cursor::new(""), std::io::sink())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::EmptyInput));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
