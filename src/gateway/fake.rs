//! In-process stand-in for the portal backend, used by view tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::dto::*;
use super::error::{GatewayError, GatewayResult};
use super::PortalApi;
use crate::session::Session;

/// Scripted failure for one operation
#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Unavailable,
    Api(u16, Option<&'static str>),
}

impl Failure {
    fn to_error(&self) -> GatewayError {
        match self {
            Failure::Unavailable => GatewayError::Unavailable,
            Failure::Api(status, detail) => GatewayError::Api {
                status: *status,
                detail: detail.map(str::to_string),
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct FakePortal {
    pub colleges: Vec<College>,
    pub courses: Vec<Course>,
    pub applications: Vec<Application>,
    pub appointments: Vec<Appointment>,
    pub enquiries: Vec<Enquiry>,
    pub stats: AdminStats,
    pub testimonials: Vec<Testimonial>,
    pub user: Option<UserProfile>,
    pub delay: Duration,

    pub submitted: Mutex<Vec<ApplicationRequest>>,
    pub booked: Mutex<Vec<AppointmentRequest>>,
    pub enquiries_sent: Mutex<Vec<EnquiryRequest>>,
    pub registered: Mutex<Vec<RegisterRequest>>,

    failures: Mutex<HashMap<&'static str, Failure>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self {
            colleges: sample_colleges(),
            courses: sample_courses(),
            user: Some(student_profile()),
            ..Default::default()
        }
    }

    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(op, failure);
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    async fn enter(&self, op: &'static str) -> GatewayResult<()> {
        *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failure = self.failures.lock().unwrap().get(op).cloned();
        match failure {
            Some(f) => Err(f.to_error()),
            None => Ok(()),
        }
    }

    fn auth_response(&self) -> GatewayResult<AuthResponse> {
        let user = self.user.clone().ok_or(GatewayError::Api {
            status: 401,
            detail: Some("Invalid email or password".into()),
        })?;

        Ok(AuthResponse {
            message: "Login successful".into(),
            access_token: format!("token-{}", user.id),
            token_type: "bearer".into(),
            user,
        })
    }
}

#[async_trait]
impl PortalApi for FakePortal {
    async fn list_colleges(&self) -> GatewayResult<Vec<College>> {
        self.enter("list_colleges").await?;
        Ok(self.colleges.clone())
    }

    async fn list_courses(&self) -> GatewayResult<Vec<Course>> {
        self.enter("list_courses").await?;
        Ok(self.courses.clone())
    }

    async fn login(&self, _request: &LoginRequest) -> GatewayResult<AuthResponse> {
        self.enter("login").await?;
        self.auth_response()
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse> {
        self.enter("register").await?;
        self.registered.lock().unwrap().push(request.clone());
        self.auth_response()
    }

    async fn current_user(&self, _session: &Session) -> GatewayResult<UserProfile> {
        self.enter("current_user").await?;
        self.auth_response().map(|auth| auth.user)
    }

    async fn submit_application(
        &self,
        session: &Session,
        request: &ApplicationRequest,
    ) -> GatewayResult<Option<Application>> {
        self.enter("submit_application").await?;
        self.submitted.lock().unwrap().push(request.clone());

        Ok(Some(Application {
            id: "app-1".into(),
            student_id: session.user().id.clone(),
            college_id: request.college_id.clone(),
            course_id: request.course_id.clone(),
            status: ApplicationStatus::Pending,
            documents: request.documents.clone(),
            notes: Some(request.notes.clone()),
            applied_date: None,
        }))
    }

    async fn list_applications(&self, _session: &Session) -> GatewayResult<Vec<Application>> {
        self.enter("list_applications").await?;
        Ok(self.applications.clone())
    }

    async fn book_appointment(
        &self,
        session: &Session,
        request: &AppointmentRequest,
    ) -> GatewayResult<Option<Appointment>> {
        self.enter("book_appointment").await?;
        self.booked.lock().unwrap().push(request.clone());

        Ok(Some(Appointment {
            id: "apt-1".into(),
            student_id: session.user().id.clone(),
            counsellor_id: None,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time.clone(),
            purpose: request.purpose.clone(),
            status: AppointmentStatus::Scheduled,
            notes: request.notes.clone(),
        }))
    }

    async fn list_appointments(&self, _session: &Session) -> GatewayResult<Vec<Appointment>> {
        self.enter("list_appointments").await?;
        Ok(self.appointments.clone())
    }

    async fn submit_enquiry(&self, request: &EnquiryRequest) -> GatewayResult<Option<Enquiry>> {
        self.enter("submit_enquiry").await?;
        self.enquiries_sent.lock().unwrap().push(request.clone());

        Ok(Some(Enquiry {
            id: "enq-1".into(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            subject: request.subject.clone(),
            message: request.message.clone(),
            is_resolved: false,
            created_at: None,
        }))
    }

    async fn list_enquiries(&self, _session: &Session) -> GatewayResult<Vec<Enquiry>> {
        self.enter("list_enquiries").await?;
        Ok(self.enquiries.clone())
    }

    async fn admin_stats(&self, _session: &Session) -> GatewayResult<AdminStats> {
        self.enter("admin_stats").await?;
        Ok(self.stats.clone())
    }

    async fn featured_testimonials(&self) -> GatewayResult<Vec<Testimonial>> {
        self.enter("featured_testimonials").await?;
        Ok(self.testimonials.clone())
    }
}

// ============================================
// Fixtures
// ============================================

pub(crate) fn college(id: &str, name: &str, location: &str, state: &str, courses: &[&str]) -> College {
    College {
        id: id.into(),
        name: name.into(),
        location: location.into(),
        state: state.into(),
        courses: courses.iter().map(|c| c.to_string()).collect(),
        fees_range: "1-3 Lakhs".into(),
        rating: 4.5,
        description: String::new(),
        established_year: Some(2001),
    }
}

pub(crate) fn course(id: &str, name: &str, course_type: &str) -> Course {
    Course {
        id: id.into(),
        name: name.into(),
        course_type: course_type.into(),
        duration: "4 years".into(),
        eligibility: "10+2".into(),
        description: String::new(),
        career_opportunities: Vec::new(),
    }
}

pub(crate) fn sample_colleges() -> Vec<College> {
    vec![
        college("c1", "ABC Institute", "Patna", "Bihar", &["B.Tech", "Diploma"]),
        college("c2", "XYZ College", "Gaya", "Bihar", &["B.Tech"]),
        college("c3", "Ranchi Pharmacy Institute", "Ranchi", "Jharkhand", &["B.Pharma", "BPT"]),
    ]
}

pub(crate) fn sample_courses() -> Vec<Course> {
    vec![
        course("k1", "Computer Science", "B.Tech"),
        course("k2", "Pharmacy", "B.Pharma"),
        course("k3", "Mechanical Diploma", "Diploma"),
        course("k4", "Physiotherapy", "BPT"),
    ]
}

pub(crate) fn student_profile() -> UserProfile {
    UserProfile {
        id: "s1".into(),
        email: "ravi@example.in".into(),
        first_name: "Ravi".into(),
        last_name: Some("Kumar".into()),
        phone: None,
        role: Role::Student,
    }
}

pub(crate) fn student_session() -> Session {
    Session::new("token-s1", student_profile())
}

pub(crate) fn admin_session() -> Session {
    Session::new(
        "token-admin",
        UserProfile {
            id: "adm".into(),
            email: "admin@example.in".into(),
            first_name: "Anita".into(),
            last_name: None,
            phone: None,
            role: Role::Admin,
        },
    )
}
