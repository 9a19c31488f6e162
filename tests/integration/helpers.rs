//! Shared mock backend and wiring helpers for integration tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use trainhub_auth::session::SessionService;
use trainhub_auth::token::TokenDecoder;
use trainhub_client::{ApiClient, AuthApi, HttpRefreshTransport, build_http_client};
use trainhub_core::config::api::ApiConfig;

/// Scriptable backend behavior, shared with the handlers.
#[derive(Debug, Default)]
pub struct BackendState {
    /// FIFO of refresh responses: `Ok(token)` or `Err(http_status)`.
    /// An empty queue answers 500.
    pub refresh_responses: std::sync::Mutex<VecDeque<Result<String, u16>>>,
    /// Number of refresh calls served.
    pub refresh_calls: AtomicUsize,
    /// `X-WORKSPACE-ID` header observed per refresh call.
    pub refresh_workspace_headers: std::sync::Mutex<Vec<Option<String>>>,
    /// Number of API requests to answer with 401 before succeeding.
    pub deny_api_requests: AtomicUsize,
    /// Number of API calls served.
    pub api_calls: AtomicUsize,
    /// `Authorization` header observed per API call.
    pub api_auth_headers: std::sync::Mutex<Vec<Option<String>>>,
    /// Token the login endpoint hands out.
    pub login_token: std::sync::Mutex<Option<String>>,
}

impl BackendState {
    pub fn queue_refresh(&self, response: Result<String, u16>) {
        self.refresh_responses.lock().unwrap().push_back(response);
    }
}

/// A live mock backend bound to an ephemeral port.
pub struct TestBackend {
    pub state: Arc<BackendState>,
    pub addr: SocketAddr,
}

impl TestBackend {
    /// Spawns the backend and returns its handle.
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let router = Router::new()
            .route("/api/auth/refresh", post(refresh_handler))
            .route("/api/auth/login", post(login_handler))
            .route("/api/assignments", get(api_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve test backend");
        });

        Self { state, addr }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: format!("http://{}", self.addr),
            refresh_url: format!("http://{}/api/auth/refresh", self.addr),
            request_timeout_seconds: 5,
        }
    }

    /// Wires a full client stack against this backend.
    pub fn wire(&self) -> (Arc<SessionService>, ApiClient, AuthApi) {
        let config = self.api_config();
        let http = build_http_client(&config).expect("build http client");
        let transport = Arc::new(HttpRefreshTransport::new(http.clone(), &config));
        let session = Arc::new(SessionService::new(
            TokenDecoder::new(),
            transport,
            Duration::from_secs(60),
        ));
        let api = ApiClient::new(http.clone(), &config, Arc::clone(&session));
        let auth = AuthApi::new(http, &config, Arc::clone(&session));
        (session, api, auth)
    }
}

/// Mints a token with one fully granted workspace.
pub fn workspace_token(expires_in_seconds: i64) -> String {
    sign(&serde_json::json!({
        "exp": chrono::Utc::now().timestamp() + expires_in_seconds,
        "sub": "jo@example.com",
        "user_id": "u-1",
        "first_name": "Jo",
        "last_name": "Dune",
        "ws1": {
            "roles": {"simulator": ["Manager"]},
            "permissions": {"simulator": {"training": ["ACCESS", "READ", "CREATE"]}},
        },
    }))
}

/// Mints a token carrying no workspace block at all.
pub fn workspaceless_token() -> String {
    sign(&serde_json::json!({
        "exp": chrono::Utc::now().timestamp() + 3600,
        "sub": "jo@example.com",
        "user_id": "u-1",
    }))
}

fn sign(claims: &serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode test token")
}

async fn refresh_handler(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    state.refresh_workspace_headers.lock().unwrap().push(
        headers
            .get("X-WORKSPACE-ID")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    match state.refresh_responses.lock().unwrap().pop_front() {
        Some(Ok(token)) => (StatusCode::OK, token).into_response(),
        Some(Err(status)) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn login_handler(
    State(state): State<Arc<BackendState>>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Response {
    if body.get("password").and_then(|v| v.as_str()) != Some("secret") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let token = state.login_token.lock().unwrap().clone().unwrap_or_default();
    axum::Json(serde_json::json!({
        "token": token,
        "user": {
            "id": "u-1",
            "email": body.get("email").and_then(|v| v.as_str()).unwrap_or_default(),
            "name": "Jo Dune",
            "role": "Manager",
        },
    }))
    .into_response()
}

async fn api_handler(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.api_calls.fetch_add(1, Ordering::SeqCst);
    state.api_auth_headers.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    if state.deny_api_requests.load(Ordering::SeqCst) > 0 {
        state.deny_api_requests.fetch_sub(1, Ordering::SeqCst);
        return StatusCode::UNAUTHORIZED.into_response();
    }

    axum::Json(serde_json::json!([
        {"id": "a-1", "title": "Cockpit basics"},
    ]))
    .into_response()
}
