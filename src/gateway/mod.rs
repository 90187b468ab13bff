//! Remote Data Gateway
//!
//! Translates in-process calls into HTTP requests against the portal
//! backend and hands typed results back to the views.
//!
//! # Endpoints
//!
//! ## Public
//! - `GET /api/colleges` - College catalogue
//! - `GET /api/courses` - Course catalogue
//! - `GET /api/testimonials?featured_only=true` - Featured testimonials
//! - `POST /api/enquiries` - Contact form submission
//! - `POST /api/auth/login`, `POST /api/auth/register` - Token issuance
//!
//! ## Bearer token required
//! - `GET /api/auth/me` - Current profile
//! - `GET|POST /api/applications` - Student applications
//! - `GET|POST /api/appointments` - Counselling appointments
//! - `GET /api/enquiries` - Enquiry inbox (admin)
//! - `GET /api/admin/stats` - Aggregate counters (admin)
//!
//! Read responses are decoded against the DTOs in [`dto`] at this boundary; a
//! body that does not match becomes [`GatewayError::Decode`] rather than
//! leaking half-shaped data into a view.
//!
//! Writes (`POST` of applications, appointments and enquiries) succeed on any
//! 2xx status. The echoed record is `Some` only when the body decodes.

mod client;
pub mod dto;
mod error;

#[cfg(test)]
pub(crate) mod fake;

pub use client::Gateway;
pub use dto::*;
pub use error::{GatewayError, GatewayResult, GENERIC_ERROR_MESSAGE};

use async_trait::async_trait;

use crate::session::Session;

/// Operations the portal backend offers.
///
/// Views depend on this trait rather than on [`Gateway`] directly.
/// Authenticated operations take the caller's [`Session`] explicitly.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn list_colleges(&self) -> GatewayResult<Vec<College>>;

    async fn list_courses(&self) -> GatewayResult<Vec<Course>>;

    async fn login(&self, request: &LoginRequest) -> GatewayResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse>;

    async fn current_user(&self, session: &Session) -> GatewayResult<UserProfile>;

    async fn submit_application(
        &self,
        session: &Session,
        request: &ApplicationRequest,
    ) -> GatewayResult<Option<Application>>;

    async fn list_applications(&self, session: &Session) -> GatewayResult<Vec<Application>>;

    async fn book_appointment(
        &self,
        session: &Session,
        request: &AppointmentRequest,
    ) -> GatewayResult<Option<Appointment>>;

    async fn list_appointments(&self, session: &Session) -> GatewayResult<Vec<Appointment>>;

    async fn submit_enquiry(&self, request: &EnquiryRequest) -> GatewayResult<Option<Enquiry>>;

    async fn list_enquiries(&self, session: &Session) -> GatewayResult<Vec<Enquiry>>;

    async fn admin_stats(&self, session: &Session) -> GatewayResult<AdminStats>;

    async fn featured_testimonials(&self) -> GatewayResult<Vec<Testimonial>>;
}
