//! Session State
//!
//! Holds the current authenticated identity (bearer token plus cached
//! profile). It is created once at startup from the [`SessionStore`] and
//! passed explicitly to whatever needs it; nothing reads the token from
//! ambient storage.
//!
//! ## Lifecycle
//!
//! 1. [`SessionState::restore`] loads any persisted session
//! 2. [`SessionState::login`] / [`SessionState::register`] replace it on success
//! 3. [`SessionState::logout`] clears memory and disk unconditionally
//!
//! Failed login or registration never touches the stored state. Token expiry
//! is not tracked here; an expired token surfaces as an ordinary gateway
//! error on the next call.

mod forms;
mod store;

pub use forms::{LoginForm, RegisterForm};
pub use store::SessionStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::form::FormError;
use crate::gateway::{AuthResponse, GatewayError, PortalApi, UserProfile};

const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// An authenticated identity: issued token plus profile
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    token: String,
    user: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self::new(auth.access_token, auth.user)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Session persistence errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to encode session: {0}")]
    Encode(String),
}

/// Why a login or registration did not go through
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please sign in first")]
    NotAuthenticated,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: GatewayError,
    },
}

impl AuthError {
    fn rejected(source: GatewayError, fallback: &str) -> Self {
        AuthError::Rejected {
            message: source.user_message(fallback),
            source,
        }
    }

    /// Message to show next to the form
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Process-wide holder of the current session
pub struct SessionState {
    current: Option<Session>,
    store: SessionStore,
}

impl SessionState {
    /// Initialize from persisted storage
    pub fn restore(store: SessionStore) -> Self {
        let current = store.load();
        if let Some(session) = &current {
            tracing::debug!(user = %session.user().email, "Restored persisted session");
        }

        Self { current, store }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.current.as_ref().map(Session::user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(Session::token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The current session, or `NotAuthenticated`
    pub fn require(&self) -> Result<&Session, SessionError> {
        self.current.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    /// Sign in with email and password.
    ///
    /// On failure the stored session is left exactly as it was.
    pub async fn login(
        &mut self,
        api: &dyn PortalApi,
        form: &LoginForm,
    ) -> Result<&UserProfile, AuthError> {
        let request = form.validate()?;

        let auth = api.login(&request).await.map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "Login rejected");
            AuthError::rejected(e, LOGIN_FAILED_MESSAGE)
        })?;

        tracing::info!(user = %auth.user.email, role = auth.user.role.as_str(), "Signed in");
        Ok(self.establish(auth))
    }

    /// Create an account and sign in with it
    pub async fn register(
        &mut self,
        api: &dyn PortalApi,
        form: &RegisterForm,
    ) -> Result<&UserProfile, AuthError> {
        let request = form.validate()?;

        let auth = api.register(&request).await.map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "Registration rejected");
            AuthError::rejected(e, REGISTER_FAILED_MESSAGE)
        })?;

        tracing::info!(user = %auth.user.email, "Registered new account");
        Ok(self.establish(auth))
    }

    /// Re-read the profile from the backend and update the cached copy
    pub async fn refresh_profile(&mut self, api: &dyn PortalApi) -> Result<&UserProfile, AuthError> {
        let session = self
            .current
            .as_ref()
            .ok_or(AuthError::NotAuthenticated)?;

        let profile = api
            .current_user(session)
            .await
            .map_err(|e| AuthError::rejected(e, "Could not load your profile."))?;

        let refreshed = Session::new(session.token().to_string(), profile);
        Ok(self.establish_session(refreshed))
    }

    /// Clear token and profile. Safe to call when already logged out.
    pub fn logout(&mut self) {
        if self.current.take().is_some() {
            tracing::info!("Signed out");
        }

        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
    }

    fn establish(&mut self, auth: AuthResponse) -> &UserProfile {
        self.establish_session(Session::from(auth))
    }

    fn establish_session(&mut self, session: Session) -> &UserProfile {
        // A session that cannot be written is still valid for this run
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }

        self.current.insert(session).user()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::{student_session, Failure, FakePortal};
    use tempfile::tempdir;

    fn login_form() -> LoginForm {
        LoginForm {
            email: "ravi@example.in".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_login_stores_token_and_profile() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let api = FakePortal::new();

        let mut state = SessionState::restore(SessionStore::new(&path));
        assert!(!state.is_authenticated());

        let user = state.login(&api, &login_form()).await.unwrap();
        assert_eq!(user.first_name, "Ravi");
        assert_eq!(state.token(), Some("token-s1"));

        // Survives a restart
        let restored = SessionState::restore(SessionStore::new(&path));
        assert_eq!(restored.token(), Some("token-s1"));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_state_unset() {
        let api = FakePortal::new();
        api.fail("login", Failure::Api(401, Some("Invalid credentials")));

        let mut state = SessionState::restore(SessionStore::ephemeral());
        let err = state.login(&api, &login_form()).await.unwrap_err();

        assert_eq!(err.message(), "Invalid credentials");
        assert!(state.token().is_none());
        assert!(state.user().is_none());
    }

    #[tokio::test]
    async fn test_login_failure_keeps_previous_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&student_session()).unwrap();

        let api = FakePortal::new();
        api.fail("login", Failure::Unavailable);

        let mut state = SessionState::restore(store);
        let err = state.login(&api, &login_form()).await.unwrap_err();

        assert_eq!(err.message(), crate::gateway::GENERIC_ERROR_MESSAGE);
        assert_eq!(state.token(), Some("token-s1"));
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let api = FakePortal::new();
        let mut state = SessionState::restore(SessionStore::ephemeral());

        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret1".into(),
        };
        let err = state.login(&api, &form).await.unwrap_err();

        assert!(matches!(err, AuthError::Form(FormError::InvalidEmail)));
        assert_eq!(api.calls("login"), 0);
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let api = FakePortal::new();
        let mut state = SessionState::restore(SessionStore::ephemeral());

        let form = RegisterForm {
            email: "ravi@example.in".into(),
            phone: String::new(),
            password: "secret1".into(),
            first_name: "Ravi".into(),
            last_name: "Kumar".into(),
        };
        state.register(&api, &form).await.unwrap();

        assert!(state.is_authenticated());
        let sent = api.registered.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone, None);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let api = FakePortal::new();
        api.fail("register", Failure::Api(400, Some("Email already registered")));
        let mut state = SessionState::restore(SessionStore::ephemeral());

        let form = RegisterForm {
            email: "ravi@example.in".into(),
            phone: "9876543210".into(),
            password: "secret1".into(),
            first_name: "Ravi".into(),
            last_name: "Kumar".into(),
        };
        let err = state.register(&api, &form).await.unwrap_err();

        assert_eq!(err.message(), "Email already registered");
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut state = SessionState::restore(SessionStore::new(&path));
        state.logout();
        assert!(!state.is_authenticated());

        SessionStore::new(&path).save(&student_session()).unwrap();
        let mut state = SessionState::restore(SessionStore::new(&path));
        assert!(state.is_authenticated());

        state.logout();
        state.logout();
        assert!(state.token().is_none());
        assert!(state.user().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_refresh_profile_keeps_token() {
        let mut api = FakePortal::new();
        let mut profile = crate::gateway::fake::student_profile();
        profile.phone = Some("9876543210".into());
        api.user = Some(profile);

        let store = SessionStore::ephemeral();
        let mut state = SessionState::restore(store);
        state.establish_session(student_session());

        let user = state.refresh_profile(&api).await.unwrap();
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
        assert_eq!(state.token(), Some("token-s1"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", student_session());
        assert!(!rendered.contains("token-s1"));
        assert!(rendered.contains("<redacted>"));
    }
}
