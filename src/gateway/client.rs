//! Portal REST Client
//!
//! reqwest-backed implementation of [`PortalApi`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use super::dto::*;
use super::error::{GatewayError, GatewayResult};
use super::PortalApi;
use crate::config::GatewayConfig;
use crate::session::Session;

/// HTTP client for the portal backend
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    /// Create a gateway for the configured backend
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(GatewayError::Request)?;

        Ok(Self {
            client,
            // Normalize: remove trailing slash
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&Session>,
    ) -> GatewayResult<T> {
        let builder = Self::authorize(self.client.get(self.url(path)), session);
        self.send(builder, "GET", path).await
    }

    async fn post<B, T>(&self, path: &str, body: &B, session: Option<&Session>) -> GatewayResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = Self::authorize(self.client.post(self.url(path)).json(body), session);
        self.send(builder, "POST", path).await
    }

    /// POST that creates a record. Success is decided by status alone.
    async fn create<B, T>(
        &self,
        path: &str,
        body: &B,
        session: Option<&Session>,
    ) -> GatewayResult<Option<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = Self::authorize(self.client.post(self.url(path)).json(body), session);
        let request_id = uuid::Uuid::new_v4().to_string();
        let body = self.dispatch(builder, &request_id, "POST", path).await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // The write went through; only the echo is unusable.
                tracing::warn!(
                    request_id = %request_id,
                    path,
                    error = %e,
                    "Created record did not match schema"
                );
                Ok(None)
            }
        }
    }

    /// Send a request and decode the response body.
    ///
    /// No retries: every failure goes straight back to the caller.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> GatewayResult<T> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let body = self.dispatch(builder, &request_id, method, path).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(request_id = %request_id, path, error = %e, "Response did not match schema");
            GatewayError::Decode(e.to_string())
        })
    }

    /// Send a request and return the body of a 2xx response.
    async fn dispatch(
        &self,
        builder: RequestBuilder,
        request_id: &str,
        method: &'static str,
        path: &str,
    ) -> GatewayResult<String> {
        tracing::debug!(request_id, method, path, "Sending backend request");

        let response = builder
            .header("X-Request-Id", request_id)
            .send()
            .await
            .map_err(|e| {
                let err = GatewayError::from_transport(e);
                tracing::warn!(request_id, method, path, error = %err, "Backend request failed");
                err
            })?;

        Self::read_body(response, request_id, path).await
    }

    async fn read_body(response: Response, request_id: &str, path: &str) -> GatewayResult<String> {
        let status = response.status();
        let body = response.text().await.map_err(GatewayError::from_transport)?;

        if !status.is_success() {
            let err = GatewayError::from_response(status.as_u16(), &body);
            tracing::warn!(
                request_id,
                path,
                status = status.as_u16(),
                error = %err,
                "Backend returned an error"
            );
            return Err(err);
        }

        Ok(body)
    }
}

#[async_trait]
impl PortalApi for Gateway {
    async fn list_colleges(&self) -> GatewayResult<Vec<College>> {
        self.get("/api/colleges", None).await
    }

    async fn list_courses(&self) -> GatewayResult<Vec<Course>> {
        self.get("/api/courses", None).await
    }

    async fn login(&self, request: &LoginRequest) -> GatewayResult<AuthResponse> {
        self.post("/api/auth/login", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse> {
        self.post("/api/auth/register", request, None).await
    }

    async fn current_user(&self, session: &Session) -> GatewayResult<UserProfile> {
        self.get("/api/auth/me", Some(session)).await
    }

    async fn submit_application(
        &self,
        session: &Session,
        request: &ApplicationRequest,
    ) -> GatewayResult<Option<Application>> {
        self.create("/api/applications", request, Some(session)).await
    }

    async fn list_applications(&self, session: &Session) -> GatewayResult<Vec<Application>> {
        self.get("/api/applications", Some(session)).await
    }

    async fn book_appointment(
        &self,
        session: &Session,
        request: &AppointmentRequest,
    ) -> GatewayResult<Option<Appointment>> {
        self.create("/api/appointments", request, Some(session)).await
    }

    async fn list_appointments(&self, session: &Session) -> GatewayResult<Vec<Appointment>> {
        self.get("/api/appointments", Some(session)).await
    }

    async fn submit_enquiry(&self, request: &EnquiryRequest) -> GatewayResult<Option<Enquiry>> {
        self.create("/api/enquiries", request, None).await
    }

    async fn list_enquiries(&self, session: &Session) -> GatewayResult<Vec<Enquiry>> {
        self.get("/api/enquiries", Some(session)).await
    }

    async fn admin_stats(&self, session: &Session) -> GatewayResult<AdminStats> {
        self.get("/api/admin/stats", Some(session)).await
    }

    async fn featured_testimonials(&self) -> GatewayResult<Vec<Testimonial>> {
        let path = "/api/testimonials";
        let builder = self
            .client
            .get(self.url(path))
            .query(&[("featured_only", "true")]);
        self.send(builder, "GET", path).await
    }
}
