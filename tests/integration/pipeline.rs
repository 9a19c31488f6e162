//! Request pipeline behavior: bearer attachment and the single
//! refresh-and-retry on 401.

use std::sync::atomic::Ordering;

use trainhub_core::error::ErrorKind;

use crate::helpers::{TestBackend, workspace_token};

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let backend = TestBackend::spawn().await;
    let (session, api, _auth) = backend.wire();
    let token = workspace_token(3600);
    session.set_token(&token, None).expect("set token");

    let response = api.get("/api/assignments").await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let headers = backend.state.api_auth_headers.lock().unwrap();
    assert_eq!(headers.as_slice(), &[Some(format!("Bearer {token}"))]);
}

#[tokio::test]
async fn test_absent_token_proceeds_unauthenticated() {
    let backend = TestBackend::spawn().await;
    let (_session, api, _auth) = backend.wire();

    let response = api.get("/api/assignments").await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let headers = backend.state.api_auth_headers.lock().unwrap();
    assert_eq!(headers.as_slice(), &[None]);
}

#[tokio::test]
async fn test_401_triggers_exactly_one_refresh_and_retry() {
    let backend = TestBackend::spawn().await;
    let (session, api, _auth) = backend.wire();
    session
        .set_token(&workspace_token(3600), None)
        .expect("set token");

    backend.state.deny_api_requests.store(1, Ordering::SeqCst);
    let fresh_token = workspace_token(7200);
    backend.state.queue_refresh(Ok(fresh_token.clone()));

    let response = api.get("/api/assignments").await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    assert_eq!(backend.state.api_calls.load(Ordering::SeqCst), 2);
    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 1);

    // The resubmission carries the refreshed token.
    let headers = backend.state.api_auth_headers.lock().unwrap();
    assert_eq!(headers[1], Some(format!("Bearer {fresh_token}")));
}

#[tokio::test]
async fn test_second_401_surfaces_without_looping() {
    let backend = TestBackend::spawn().await;
    let (session, api, _auth) = backend.wire();
    session
        .set_token(&workspace_token(3600), None)
        .expect("set token");

    backend.state.deny_api_requests.store(2, Ordering::SeqCst);
    backend.state.queue_refresh(Ok(workspace_token(7200)));

    let err = api.get("/api/assignments").await.expect_err("must fail");
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    // Original request plus exactly one retry.
    assert_eq!(backend.state.api_calls.load(Ordering::SeqCst), 2);
    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_refresh_after_401_logs_out() {
    let backend = TestBackend::spawn().await;
    let (session, api, _auth) = backend.wire();
    session
        .set_token(&workspace_token(3600), None)
        .expect("set token");

    backend.state.deny_api_requests.store(1, Ordering::SeqCst);
    backend.state.queue_refresh(Err(500));

    let err = api.get("/api/assignments").await.expect_err("must fail");
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    // No resubmission happened and the session is gone.
    assert_eq!(backend.state.api_calls.load(Ordering::SeqCst), 1);
    assert!(!session.is_authenticated());
    assert_eq!(session.current_user(), None);
}
