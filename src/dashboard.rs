//! Dashboards
//!
//! Read-only views over data fetched at mount:
//!
//! - [`StudentDashboard`]: the signed-in student's applications and
//!   appointments
//! - [`AdminDashboard`]: aggregate counters, every application and the
//!   enquiry inbox
//!
//! Each piece of data lives in its own [`Slice`]. The slices are fetched
//! concurrently and independently; one failing leaves the others alone and
//! records a message on the failed slice. Nothing is retried automatically:
//! `retry_failed` re-fetches only the slices that failed, when the user asks.
//!
//! Loads run inside the view's [`ViewScope`]. If the scope is disposed first
//! the results are dropped and no slice changes.

use std::future::Future;

use crate::gateway::{
    AdminStats, Application, ApplicationStatus, Appointment, AppointmentStatus, Enquiry,
    GatewayResult, PortalApi, UserProfile,
};
use crate::scope::ViewScope;
use crate::session::Session;

const STUDENT_RECENT: usize = 3;
const ADMIN_RECENT: usize = 5;

/// One independently fetched piece of dashboard data
#[derive(Debug, Clone, Default)]
pub struct Slice<T> {
    value: T,
    loaded: bool,
    error: Option<String>,
}

impl<T> Slice<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether a fetch has succeeded at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Message from the last failed fetch, cleared by a later success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    fn apply(&mut self, slice: &'static str, result: GatewayResult<T>) {
        match result {
            Ok(value) => {
                self.value = value;
                self.loaded = true;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(slice, error = %e, "Dashboard fetch failed");
                self.error = Some(e.user_message(&format!("Failed to load {slice}.")));
            }
        }
    }
}

async fn fetch_if<F: Future>(wanted: bool, fut: F) -> Option<F::Output> {
    if wanted {
        Some(fut.await)
    } else {
        None
    }
}

// ============================================
// Student
// ============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentTab {
    #[default]
    Overview,
    Applications,
    Appointments,
    Profile,
}

impl StudentTab {
    pub const ALL: [StudentTab; 4] = [
        StudentTab::Overview,
        StudentTab::Applications,
        StudentTab::Appointments,
        StudentTab::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            StudentTab::Overview => "Overview",
            StudentTab::Applications => "My Applications",
            StudentTab::Appointments => "Appointments",
            StudentTab::Profile => "Profile",
        }
    }
}

/// Figures for the student overview tab
#[derive(Debug)]
pub struct StudentOverview<'a> {
    pub total_applications: usize,
    pub approved_applications: usize,
    pub scheduled_appointments: usize,
    pub recent_applications: &'a [Application],
    pub upcoming_appointments: Vec<&'a Appointment>,
}

pub struct StudentDashboard {
    user: UserProfile,
    tab: StudentTab,
    applications: Slice<Vec<Application>>,
    appointments: Slice<Vec<Appointment>>,
}

impl StudentDashboard {
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            tab: StudentTab::default(),
            applications: Slice::default(),
            appointments: Slice::default(),
        }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn tab(&self) -> StudentTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: StudentTab) {
        self.tab = tab;
    }

    pub fn applications(&self) -> &Slice<Vec<Application>> {
        &self.applications
    }

    pub fn appointments(&self) -> &Slice<Vec<Appointment>> {
        &self.appointments
    }

    /// Fetch every slice. Returns `false` if the scope was disposed first.
    pub async fn load(&mut self, api: &dyn PortalApi, session: &Session, scope: &ViewScope) -> bool {
        self.fetch(api, session, scope, true).await
    }

    /// Fetch only the slices whose last attempt failed
    pub async fn retry_failed(
        &mut self,
        api: &dyn PortalApi,
        session: &Session,
        scope: &ViewScope,
    ) -> bool {
        self.fetch(api, session, scope, false).await
    }

    async fn fetch(
        &mut self,
        api: &dyn PortalApi,
        session: &Session,
        scope: &ViewScope,
        all: bool,
    ) -> bool {
        let want_applications = all || self.applications.has_failed();
        let want_appointments = all || self.appointments.has_failed();

        let fetched = scope
            .run(async {
                tokio::join!(
                    fetch_if(want_applications, api.list_applications(session)),
                    fetch_if(want_appointments, api.list_appointments(session)),
                )
            })
            .await;

        let Some((applications, appointments)) = fetched else {
            tracing::debug!("Student dashboard disposed before fetch completed");
            return false;
        };

        if let Some(result) = applications {
            self.applications.apply("applications", result);
        }
        if let Some(result) = appointments {
            self.appointments.apply("appointments", result);
        }
        true
    }

    pub fn overview(&self) -> StudentOverview<'_> {
        let applications = self.applications.value();
        let appointments = self.appointments.value();

        let scheduled: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .collect();

        StudentOverview {
            total_applications: applications.len(),
            approved_applications: applications
                .iter()
                .filter(|a| a.status == ApplicationStatus::Approved)
                .count(),
            scheduled_appointments: scheduled.len(),
            recent_applications: &applications[..applications.len().min(STUDENT_RECENT)],
            upcoming_appointments: scheduled.into_iter().take(STUDENT_RECENT).collect(),
        }
    }
}

// ============================================
// Admin
// ============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Overview,
    Applications,
    Enquiries,
    Colleges,
    Users,
}

impl AdminTab {
    pub const ALL: [AdminTab; 5] = [
        AdminTab::Overview,
        AdminTab::Applications,
        AdminTab::Enquiries,
        AdminTab::Colleges,
        AdminTab::Users,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AdminTab::Overview => "Overview",
            AdminTab::Applications => "Applications",
            AdminTab::Enquiries => "Enquiries",
            AdminTab::Colleges => "Colleges",
            AdminTab::Users => "Users",
        }
    }
}

#[derive(Debug)]
pub struct AdminOverview<'a> {
    pub stats: &'a AdminStats,
    pub recent_applications: &'a [Application],
    pub recent_enquiries: &'a [Enquiry],
}

#[derive(Default)]
pub struct AdminDashboard {
    tab: AdminTab,
    stats: Slice<AdminStats>,
    applications: Slice<Vec<Application>>,
    enquiries: Slice<Vec<Enquiry>>,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: AdminTab) {
        self.tab = tab;
    }

    pub fn stats(&self) -> &Slice<AdminStats> {
        &self.stats
    }

    pub fn applications(&self) -> &Slice<Vec<Application>> {
        &self.applications
    }

    pub fn enquiries(&self) -> &Slice<Vec<Enquiry>> {
        &self.enquiries
    }

    /// Enquiries not yet marked resolved
    pub fn open_enquiries(&self) -> impl Iterator<Item = &Enquiry> {
        self.enquiries.value().iter().filter(|e| !e.is_resolved)
    }

    pub async fn load(&mut self, api: &dyn PortalApi, session: &Session, scope: &ViewScope) -> bool {
        self.fetch(api, session, scope, true).await
    }

    pub async fn retry_failed(
        &mut self,
        api: &dyn PortalApi,
        session: &Session,
        scope: &ViewScope,
    ) -> bool {
        self.fetch(api, session, scope, false).await
    }

    async fn fetch(
        &mut self,
        api: &dyn PortalApi,
        session: &Session,
        scope: &ViewScope,
        all: bool,
    ) -> bool {
        let want_stats = all || self.stats.has_failed();
        let want_applications = all || self.applications.has_failed();
        let want_enquiries = all || self.enquiries.has_failed();

        let fetched = scope
            .run(async {
                tokio::join!(
                    fetch_if(want_stats, api.admin_stats(session)),
                    fetch_if(want_applications, api.list_applications(session)),
                    fetch_if(want_enquiries, api.list_enquiries(session)),
                )
            })
            .await;

        let Some((stats, applications, enquiries)) = fetched else {
            tracing::debug!("Admin dashboard disposed before fetch completed");
            return false;
        };

        if let Some(result) = stats {
            self.stats.apply("stats", result);
        }
        if let Some(result) = applications {
            self.applications.apply("applications", result);
        }
        if let Some(result) = enquiries {
            self.enquiries.apply("enquiries", result);
        }
        true
    }

    pub fn overview(&self) -> AdminOverview<'_> {
        let applications = self.applications.value();
        let enquiries = self.enquiries.value();

        AdminOverview {
            stats: self.stats.value(),
            recent_applications: &applications[..applications.len().min(ADMIN_RECENT)],
            recent_enquiries: &enquiries[..enquiries.len().min(ADMIN_RECENT)],
        }
    }
}
