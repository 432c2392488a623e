//! services/tracker/src/pages/auth.rs
//!
//! The login and signup pages: form validation, the auth gateway call,
//! response classification, and the session store handoff.

use expense_tracker_core::policy::{self, AuthOutcome};
use expense_tracker_core::ports::AuthGateway;
use expense_tracker_core::validate::{self, SignupForm};
use std::sync::Arc;
use tracing::error;

use crate::error::ClientError;
use crate::pages::Route;
use crate::session::SessionStore;

/// What the login page does after submit.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginResult {
    LoggedIn { navigate: Route },
    Notice(String),
}

/// What the signup page does after submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SignupResult {
    LoggedIn { navigate: Route },
    /// Account created without auto-login; the caller shows the message
    /// and sends the user to the login page.
    Registered { message: String, navigate: Route },
    Notice(String),
}

pub struct AuthPages {
    gateway: Arc<dyn AuthGateway>,
}

impl AuthPages {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    pub async fn login(
        &self,
        session: &mut SessionStore,
        email: &str,
        password: &str,
    ) -> Result<LoginResult, ClientError> {
        let credentials = match validate::validate_login(email, password) {
            Ok(credentials) => credentials,
            Err(message) => return Ok(LoginResult::Notice(message)),
        };
        let response = match self.gateway.login(&credentials).await {
            Ok(response) => response,
            Err(err) => {
                error!("login error: {err}");
                return Ok(LoginResult::Notice(
                    "An unexpected error occurred. Please try again.".to_string(),
                ));
            }
        };
        match policy::read_login_response(&response, &credentials.email) {
            AuthOutcome::LoggedIn { token, user } => {
                session.login(token, user).await?;
                Ok(LoginResult::LoggedIn {
                    navigate: Route::Dashboard,
                })
            }
            AuthOutcome::Registered { message } | AuthOutcome::Failed { message } => {
                Ok(LoginResult::Notice(message))
            }
        }
    }

    pub async fn signup(
        &self,
        session: &mut SessionStore,
        form: &SignupForm,
    ) -> Result<SignupResult, ClientError> {
        let registration = match validate::validate_signup(form) {
            Ok(registration) => registration,
            Err(message) => return Ok(SignupResult::Notice(message)),
        };
        let response = match self.gateway.register(&registration).await {
            Ok(response) => response,
            Err(err) => {
                error!("signup error: {err}");
                return Ok(SignupResult::Notice(
                    "An unexpected error occurred. Please try again.".to_string(),
                ));
            }
        };
        match policy::read_register_response(&response, &registration) {
            AuthOutcome::LoggedIn { token, user } => {
                session.login(token, user).await?;
                Ok(SignupResult::LoggedIn {
                    navigate: Route::Dashboard,
                })
            }
            AuthOutcome::Registered { message } => Ok(SignupResult::Registered {
                message,
                navigate: Route::Login,
            }),
            AuthOutcome::Failed { message } => Ok(SignupResult::Notice(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeAuthGateway, MemoryStorage};
    use expense_tracker_core::ports::{GatewayError, GatewayResponse, Headers};
    use serde_json::json;

    fn fresh_session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::default()))
    }

    fn response(succeeded: bool, status: u16, body: serde_json::Value) -> GatewayResponse {
        GatewayResponse {
            succeeded,
            status,
            body: Some(body),
            raw: None,
            headers: Headers::new(),
        }
    }

    #[tokio::test]
    async fn successful_login_opens_the_session() {
        let gateway = Arc::new(FakeAuthGateway::default());
        let pages = AuthPages::new(gateway);
        let mut session = fresh_session();

        let result = pages.login(&mut session, "a@b.c", "pw").await.unwrap();
        assert_eq!(result, LoginResult::LoggedIn { navigate: Route::Dashboard });
        assert!(session.is_authenticated());
        assert_eq!(session.require_token().unwrap(), "tok");
    }

    #[tokio::test]
    async fn rejected_login_surfaces_the_message() {
        let gateway = Arc::new(FakeAuthGateway::default());
        gateway.set_login(Ok(response(false, 401, json!({ "message": "bad credentials" }))));
        let pages = AuthPages::new(gateway);
        let mut session = fresh_session();

        let result = pages.login(&mut session, "a@b.c", "pw").await.unwrap();
        assert_eq!(result, LoginResult::Notice("bad credentials".to_string()));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn empty_login_form_never_reaches_the_gateway() {
        let pages = AuthPages::new(Arc::new(FakeAuthGateway::default()));
        let mut session = fresh_session();
        let result = pages.login(&mut session, "", "").await.unwrap();
        assert_eq!(
            result,
            LoginResult::Notice("Please provide both email and password.".to_string())
        );
    }

    #[tokio::test]
    async fn transport_failure_reads_as_a_generic_notice() {
        let gateway = Arc::new(FakeAuthGateway::default());
        gateway.set_login(Err(GatewayError::Transport("refused".to_string())));
        let pages = AuthPages::new(gateway);
        let mut session = fresh_session();

        let result = pages.login(&mut session, "a@b.c", "pw").await.unwrap();
        assert_eq!(
            result,
            LoginResult::Notice("An unexpected error occurred. Please try again.".to_string())
        );
    }

    #[tokio::test]
    async fn signup_without_auto_login_routes_to_login() {
        let gateway = Arc::new(FakeAuthGateway::default());
        gateway.set_register(Ok(response(true, 201, json!({ "message": "check your inbox" }))));
        let pages = AuthPages::new(gateway);
        let mut session = fresh_session();

        let form = SignupForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            agreed_to_terms: true,
        };
        let result = pages.signup(&mut session, &form).await.unwrap();
        assert_eq!(
            result,
            SignupResult::Registered {
                message: "check your inbox".to_string(),
                navigate: Route::Login,
            }
        );
        assert!(!session.is_authenticated());
    }
}
