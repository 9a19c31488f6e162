//! Session establishment flows against the mock backend.

use trainhub_core::error::ErrorKind;

use crate::helpers::{TestBackend, workspace_token, workspaceless_token};

#[tokio::test]
async fn test_boot_refresh_establishes_session() {
    let backend = TestBackend::spawn().await;
    backend.state.queue_refresh(Ok(workspace_token(3600)));
    let (session, _api, _auth) = backend.wire();

    let token = session.refresh(None).await.expect("refresh");
    assert!(!token.is_empty());
    assert!(session.is_authenticated());

    let user = session.current_user().expect("user");
    assert_eq!(user.name, "Jo Dune");
    assert_eq!(user.role, "Manager");
    assert_eq!(user.workspace_id, "ws1");
    assert!(user.permissions.granted("training"));
    assert!(user.permissions.granted("training_write"));
    assert!(user.permissions.granted("training_create"));
    assert!(!user.permissions.granted("training_delete"));

    assert_eq!(
        backend.state.refresh_calls.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn test_workspace_hint_is_sent_as_header() {
    let backend = TestBackend::spawn().await;
    backend.state.queue_refresh(Ok(workspace_token(3600)));
    let (session, _api, _auth) = backend.wire();

    session
        .refresh(Some("ws1".to_string()))
        .await
        .expect("refresh");

    let headers = backend.state.refresh_workspace_headers.lock().unwrap();
    assert_eq!(headers.as_slice(), &[Some("ws1".to_string())]);
}

#[tokio::test]
async fn test_refresh_server_error_surfaces_and_clears() {
    let backend = TestBackend::spawn().await;
    backend.state.queue_refresh(Err(500));
    let (session, _api, _auth) = backend.wire();

    let err = session.refresh(None).await.expect_err("must fail");
    assert_eq!(err.kind, ErrorKind::RefreshNetwork);
    assert!(!session.is_authenticated());
    assert_eq!(session.current_user(), None);
}

#[tokio::test]
async fn test_token_without_workspace_rejects() {
    let backend = TestBackend::spawn().await;
    backend.state.queue_refresh(Ok(workspaceless_token()));
    let (session, _api, _auth) = backend.wire();

    let err = session.refresh(None).await.expect_err("must fail");
    assert_eq!(err.kind, ErrorKind::NoWorkspace);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_seeds_session() {
    let backend = TestBackend::spawn().await;
    *backend.state.login_token.lock().unwrap() = Some(workspace_token(3600));
    let (session, _api, auth) = backend.wire();

    let user = auth
        .login("jo@example.com", "secret", None)
        .await
        .expect("login");
    assert_eq!(user.email, "jo@example.com");
    assert!(session.is_authenticated());
    // Login never touches the refresh endpoint.
    assert_eq!(
        backend.state.refresh_calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn test_login_with_bad_password_is_rejected() {
    let backend = TestBackend::spawn().await;
    *backend.state.login_token.lock().unwrap() = Some(workspace_token(3600));
    let (session, _api, auth) = backend.wire();

    let err = auth
        .login("jo@example.com", "wrong", None)
        .await
        .expect_err("must fail");
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_logout_after_login_is_idempotent() {
    let backend = TestBackend::spawn().await;
    *backend.state.login_token.lock().unwrap() = Some(workspace_token(3600));
    let (session, _api, auth) = backend.wire();

    auth.login("jo@example.com", "secret", None)
        .await
        .expect("login");
    session.logout();
    session.logout();

    assert!(!session.is_authenticated());
    assert_eq!(session.current_user(), None);
    assert_eq!(session.current_workspace_id(), None);
}
