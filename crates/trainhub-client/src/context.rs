//! Context value handed to the UI layer.

use std::sync::Arc;

use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;

use trainhub_auth::session::SessionService;
use trainhub_auth::user::User;

use crate::auth_api::AuthApi;

/// Navigation parameters read once at boot and preserved on every
/// generated link so redirects keep session context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavParams {
    /// Requested workspace id (`workspace_id` query parameter).
    pub workspace_id: Option<String>,
    /// Display time zone (`timeZone` query parameter).
    pub time_zone: Option<String>,
}

impl NavParams {
    /// Parses the launch query string.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "workspace_id" => params.workspace_id = Some(value.into_owned()),
                "timeZone" => params.time_zone = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Appends the preserved parameters to a link, leaving parameters the
    /// link already carries untouched.
    pub fn decorate_url(&self, link: &str) -> AppResult<String> {
        let mut parsed = url::Url::parse(link)
            .map_err(|e| AppError::internal(format!("Invalid link '{link}': {e}")))?;

        let existing: Vec<String> = parsed
            .query_pairs()
            .map(|(key, _)| key.into_owned())
            .collect();

        {
            let mut pairs = parsed.query_pairs_mut();
            if let Some(workspace_id) = &self.workspace_id {
                if !existing.iter().any(|key| key == "workspace_id") {
                    pairs.append_pair("workspace_id", workspace_id);
                }
            }
            if let Some(time_zone) = &self.time_zone {
                if !existing.iter().any(|key| key == "timeZone") {
                    pairs.append_pair("timeZone", time_zone);
                }
            }
        }

        Ok(parsed.into())
    }
}

/// The value the UI layer consumes: current user, authentication state,
/// login/logout, and preserved navigation context.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Session facade.
    session: Arc<SessionService>,
    /// Interactive auth bindings.
    auth_api: AuthApi,
    /// Boot-time navigation parameters.
    nav: NavParams,
}

impl AuthContext {
    /// Creates the context over an established session service.
    pub fn new(session: Arc<SessionService>, auth_api: AuthApi, nav: NavParams) -> Self {
        Self {
            session,
            auth_api,
            nav,
        }
    }

    /// The current user, if authenticated.
    pub fn user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Point-in-time authentication state.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Logs in, preferring the boot-time workspace when the token offers
    /// several.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        self.auth_api
            .login(email, password, self.nav.workspace_id.as_deref())
            .await
    }

    /// Ends the session.
    pub fn logout(&self) {
        self.session.logout();
    }

    /// The active workspace id: the session's selection, else the boot
    /// parameter.
    pub fn current_workspace_id(&self) -> Option<String> {
        self.session
            .current_workspace_id()
            .or_else(|| self.nav.workspace_id.clone())
    }

    /// The display time zone from the boot parameters.
    pub fn current_time_zone(&self) -> Option<&str> {
        self.nav.time_zone.as_deref()
    }

    /// Decorates an internal link with the preserved navigation context,
    /// using the session's selected workspace when one exists.
    pub fn link(&self, url: &str) -> AppResult<String> {
        let nav = NavParams {
            workspace_id: self.current_workspace_id(),
            time_zone: self.nav.time_zone.clone(),
        };
        nav.decorate_url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_query_parameters() {
        let nav = NavParams::from_query("workspace_id=ws_acme&timeZone=Europe%2FBerlin&tab=2");
        assert_eq!(nav.workspace_id.as_deref(), Some("ws_acme"));
        assert_eq!(nav.time_zone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_empty_query_yields_defaults() {
        let nav = NavParams::from_query("");
        assert_eq!(nav, NavParams::default());
    }

    #[test]
    fn test_decorates_links_with_preserved_params() {
        let nav = NavParams {
            workspace_id: Some("ws_acme".to_string()),
            time_zone: Some("UTC".to_string()),
        };

        let link = nav
            .decorate_url("https://console.example.com/training-plans?sort=name")
            .expect("decorate");
        assert!(link.contains("sort=name"));
        assert!(link.contains("workspace_id=ws_acme"));
        assert!(link.contains("timeZone=UTC"));
    }

    #[test]
    fn test_does_not_duplicate_existing_params() {
        let nav = NavParams {
            workspace_id: Some("ws_acme".to_string()),
            time_zone: None,
        };

        let link = nav
            .decorate_url("https://console.example.com/teams?workspace_id=ws_other")
            .expect("decorate");
        assert_eq!(link.matches("workspace_id").count(), 1);
        assert!(link.contains("workspace_id=ws_other"));
    }

    #[test]
    fn test_rejects_invalid_link() {
        let nav = NavParams::default();
        assert!(nav.decorate_url("not a url").is_err());
    }
}
