//! # Edu-Mentor
//!
//! Client library for the Edu-Mentor counselling portal: a typed gateway to
//! the portal backend plus the self-service flows built on it.
//!
//! ## Modules
//!
//! - [`gateway`]: HTTP client, wire types and error taxonomy
//! - [`session`]: Signed-in identity, persisted between runs
//! - [`wizard`]: Four-step college application flow
//! - [`finder`]: College search and filtering
//! - [`booking`]: Counselling appointment booking
//! - [`contact`]: Public enquiry form
//! - [`dashboard`]: Student and admin dashboards
//! - [`testimonials`]: Featured testimonials with built-in fallback
//! - [`display`]: Status badges and star ratings
//! - [`scope`]: Cancellation tied to a view's lifetime
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edumentor::{Config, Gateway, LoginForm, SessionState, SessionStore};
//! use edumentor::wizard::ApplicationWizard;
//! use edumentor::scope::ViewScope;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let gateway = Gateway::new(&config.gateway)?;
//!     let mut session = SessionState::restore(SessionStore::new(config.session.path()));
//!
//!     let form = LoginForm {
//!         email: "ravi@example.in".into(),
//!         password: "secret1".into(),
//!     };
//!     session.login(&gateway, &form).await?;
//!
//!     let scope = ViewScope::new();
//!     let mut wizard = ApplicationWizard::load(&gateway, &scope).await.unwrap();
//!     wizard.select_college("c1")?;
//!     wizard.select_course("k1")?;
//!     wizard.next_step()?;
//!     wizard.add_documents(["10th-marksheet.pdf"])?;
//!     wizard.next_step()?;
//!
//!     let outcome = wizard.submit(&gateway, session.require()?).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod display;
pub mod finder;
pub mod form;
pub mod gateway;
pub mod logging;
pub mod scope;
pub mod session;
pub mod testimonials;
pub mod wizard;

pub use config::{Config, ConfigError, GatewayConfig, LoggingConfig, SessionConfig};

pub use gateway::{Gateway, GatewayError, GatewayResult, PortalApi, GENERIC_ERROR_MESSAGE};

pub use session::{
    AuthError, LoginForm, RegisterForm, Session, SessionError, SessionState, SessionStore,
};

pub use form::FormError;
pub use scope::ViewScope;
pub use wizard::{ApplicationDraft, ApplicationWizard, WizardError, WizardStep};
