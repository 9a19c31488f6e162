//! # trainhub-client
//!
//! HTTP side of the TrainHub console: the credentialed refresh transport,
//! the authenticated request pipeline with single 401 retry, the auth API
//! bindings, boot-time session establishment, and the context value handed
//! to the UI layer.

pub mod auth_api;
pub mod bootstrap;
pub mod context;
pub mod pipeline;
pub mod transport;

pub use auth_api::AuthApi;
pub use bootstrap::bootstrap_session;
pub use context::{AuthContext, NavParams};
pub use pipeline::ApiClient;
pub use transport::{HttpRefreshTransport, build_http_client};
