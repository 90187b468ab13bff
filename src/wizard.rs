//! Application Wizard
//!
//! Four-step flow for applying to a college course:
//!
//! ```text
//! SelectCollegeCourse -> UploadDocuments -> ReviewSubmit -> Confirmed
//!         ^                    |   ^               |
//!         +---- prev ----------+   +---- prev -----+
//! ```
//!
//! The wizard holds a single [`ApplicationDraft`]. Step changes go through
//! [`ApplicationWizard::next_step`] / [`ApplicationWizard::prev_step`], which
//! refuse transitions the table above does not allow. `Confirmed` is
//! terminal.
//!
//! Submission is split into [`ApplicationWizard::begin_submit`] and
//! [`ApplicationWizard::finish_submit`] so a view can release the wizard while
//! the request is outstanding. Only one [`SubmitTicket`] can exist at a time,
//! which is what keeps a double click from sending the application twice.
//! Dropping a ticket, or the `submit` future holding it, releases the guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::gateway::{
    Application, ApplicationRequest, College, Course, GatewayError, PortalApi,
};
use crate::scope::ViewScope;
use crate::session::Session;

/// Advisory only; uploads are not rejected on extension
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// Checklist shown on the upload step
pub const REQUIRED_DOCUMENTS: &[&str] = &[
    "10th Mark Sheet",
    "12th Mark Sheet",
    "Transfer Certificate",
    "Character Certificate",
    "Passport Size Photos",
    "Caste Certificate (if applicable)",
];

pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Application submitted successfully! We will review your application and contact you soon.";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit application. Please try again.";

/// In-progress application data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub college_id: String,
    pub course_id: String,
    /// Uploaded file names, in upload order
    pub documents: Vec<String>,
    pub notes: String,
}

impl ApplicationDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_selection(&self) -> bool {
        !self.college_id.is_empty() && !self.course_id.is_empty()
    }

    pub fn to_request(&self) -> ApplicationRequest {
        ApplicationRequest {
            college_id: self.college_id.clone(),
            course_id: self.course_id.clone(),
            documents: self.documents.clone(),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectCollegeCourse,
    UploadDocuments,
    ReviewSubmit,
    Confirmed,
}

impl WizardStep {
    /// 1-based position, as shown in the step indicator
    pub fn number(self) -> u8 {
        match self {
            WizardStep::SelectCollegeCourse => 1,
            WizardStep::UploadDocuments => 2,
            WizardStep::ReviewSubmit => 3,
            WizardStep::Confirmed => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::SelectCollegeCourse => "Select College & Course",
            WizardStep::UploadDocuments => "Upload Documents",
            WizardStep::ReviewSubmit => "Review & Submit",
            WizardStep::Confirmed => "Application Submitted",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::SelectCollegeCourse => Some(WizardStep::UploadDocuments),
            WizardStep::UploadDocuments => Some(WizardStep::ReviewSubmit),
            // Leaving review happens only through a successful submit
            WizardStep::ReviewSubmit | WizardStep::Confirmed => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::UploadDocuments => Some(WizardStep::SelectCollegeCourse),
            WizardStep::ReviewSubmit => Some(WizardStep::UploadDocuments),
            WizardStep::SelectCollegeCourse | WizardStep::Confirmed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Select a college and a course before continuing")]
    SelectionIncomplete,

    #[error("Cannot go {direction} from step {}", .from.number())]
    InvalidTransition {
        from: WizardStep,
        direction: &'static str,
    },

    #[error("Only available on step {}, currently on step {}", .expected.number(), .actual.number())]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Unknown college {0}")]
    UnknownCollege(String),

    #[error("Course {0} is not offered by the selected college")]
    CourseNotOffered(String),

    #[error("No document at position {index} ({len} uploaded)")]
    NoSuchDocument { index: usize, len: usize },
}

/// Proof that a submission is outstanding. Consumed by `finish_submit`.
///
/// Dropped without being finished, the submission is abandoned: the wizard
/// stays on review and accepts a new `begin_submit`.
#[derive(Debug)]
#[must_use = "a submit ticket must be passed back to finish_submit"]
pub struct SubmitTicket {
    request: ApplicationRequest,
    in_flight: Arc<AtomicBool>,
}

impl SubmitTicket {
    pub fn request(&self) -> &ApplicationRequest {
        &self.request
    }
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted; carries the stored record when the backend echoed one
    Submitted(Option<Application>),
    /// Still on review; the message is what to show the user
    Failed(String),
}

/// Read-only summary for the review step
#[derive(Debug)]
pub struct ApplicationReview<'a> {
    pub college: Option<&'a College>,
    pub course: Option<&'a Course>,
    pub documents: &'a [String],
    pub notes: &'a str,
}

pub struct ApplicationWizard {
    colleges: Vec<College>,
    courses: Vec<Course>,
    draft: ApplicationDraft,
    step: WizardStep,
    in_flight: Arc<AtomicBool>,
    message: Option<String>,
    load_error: Option<String>,
}

impl ApplicationWizard {
    pub fn new(colleges: Vec<College>, courses: Vec<Course>) -> Self {
        Self {
            colleges,
            courses,
            draft: ApplicationDraft::default(),
            step: WizardStep::SelectCollegeCourse,
            in_flight: Arc::new(AtomicBool::new(false)),
            message: None,
            load_error: None,
        }
    }

    /// Mount the wizard: fetch colleges and courses once, concurrently.
    ///
    /// A failed fetch is logged, leaves that list empty and is reported by
    /// [`Self::load_error`]. Returns `None` if the scope was disposed before
    /// both fetches finished.
    pub async fn load(api: &dyn PortalApi, scope: &ViewScope) -> Option<Self> {
        let (colleges, courses) = scope
            .run(async { tokio::join!(api.list_colleges(), api.list_courses()) })
            .await?;

        let mut load_error = None;
        let colleges = colleges.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error fetching colleges");
            load_error = Some(e.user_message("Failed to load colleges."));
            Vec::new()
        });
        let courses = courses.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error fetching courses");
            if load_error.is_none() {
                load_error = Some(e.user_message("Failed to load courses."));
            }
            Vec::new()
        });

        let mut wizard = Self::new(colleges, courses);
        wizard.load_error = load_error;
        Some(wizard)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Status line from the last submission attempt
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Why the catalogue is empty, if a fetch in [`Self::load`] failed
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn selected_college(&self) -> Option<&College> {
        self.colleges.iter().find(|c| c.id == self.draft.college_id)
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == self.draft.course_id)
    }

    /// Courses the selected college offers; empty until a college is chosen
    pub fn available_courses(&self) -> Vec<&Course> {
        match self.selected_college() {
            Some(college) => self
                .courses
                .iter()
                .filter(|course| college.offers(&course.course_type))
                .collect(),
            None => Vec::new(),
        }
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Choose a college; an empty id clears the choice.
    ///
    /// A course the new college does not offer is cleared with it.
    pub fn select_college(&mut self, college_id: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SelectCollegeCourse)?;

        if !college_id.is_empty() && !self.colleges.iter().any(|c| c.id == college_id) {
            return Err(WizardError::UnknownCollege(college_id.to_string()));
        }

        self.draft.college_id = college_id.to_string();

        let still_offered = self
            .available_courses()
            .iter()
            .any(|c| c.id == self.draft.course_id);
        if !still_offered && !self.draft.course_id.is_empty() {
            tracing::debug!(
                course_id = %self.draft.course_id,
                college_id,
                "Clearing course not offered by newly selected college"
            );
            self.draft.course_id.clear();
        }

        Ok(())
    }

    /// Choose a course from [`Self::available_courses`]; an empty id clears it
    pub fn select_course(&mut self, course_id: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SelectCollegeCourse)?;

        if !course_id.is_empty() && !self.available_courses().iter().any(|c| c.id == course_id) {
            return Err(WizardError::CourseNotOffered(course_id.to_string()));
        }

        self.draft.course_id = course_id.to_string();
        Ok(())
    }

    /// Whether the "Next" affordance is enabled
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::SelectCollegeCourse => self.draft.has_selection(),
            WizardStep::UploadDocuments => true,
            WizardStep::ReviewSubmit | WizardStep::Confirmed => false,
        }
    }

    pub fn next_step(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::InvalidTransition {
            from: self.step,
            direction: "forward",
        })?;

        if self.step == WizardStep::SelectCollegeCourse && !self.draft.has_selection() {
            return Err(WizardError::SelectionIncomplete);
        }

        self.step = next;
        Ok(next)
    }

    pub fn prev_step(&mut self) -> Result<WizardStep, WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }

        let previous = self.step.previous().ok_or(WizardError::InvalidTransition {
            from: self.step,
            direction: "back",
        })?;

        self.step = previous;
        Ok(previous)
    }

    /// Append the file names from one upload event; returns the new count
    pub fn add_documents<I, S>(&mut self, names: I) -> Result<usize, WizardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expect_step(WizardStep::UploadDocuments)?;

        for name in names {
            let name = name.into();
            if !has_accepted_extension(&name) {
                tracing::debug!(document = %name, "Document extension outside the accepted list");
            }
            self.draft.documents.push(name);
        }

        Ok(self.draft.documents.len())
    }

    /// Remove the document at `index`, keeping the rest in order
    pub fn remove_document(&mut self, index: usize) -> Result<String, WizardError> {
        self.expect_step(WizardStep::UploadDocuments)?;

        let len = self.draft.documents.len();
        if index >= len {
            return Err(WizardError::NoSuchDocument { index, len });
        }

        Ok(self.draft.documents.remove(index))
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::UploadDocuments)?;
        self.draft.notes = notes.into();
        Ok(())
    }

    pub fn review(&self) -> ApplicationReview<'_> {
        ApplicationReview {
            college: self.selected_college(),
            course: self.selected_course(),
            documents: &self.draft.documents,
            notes: &self.draft.notes,
        }
    }

    /// Start a submission. Fails while another one is outstanding.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        self.expect_step(WizardStep::ReviewSubmit)?;
        if !self.draft.has_selection() {
            return Err(WizardError::SelectionIncomplete);
        }

        self.in_flight.store(true, Ordering::Release);
        self.message = None;

        Ok(SubmitTicket {
            request: self.draft.to_request(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Apply the result of the request started by `ticket`
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<Option<Application>, GatewayError>,
    ) -> SubmitOutcome {
        let request = &ticket.request;

        match result {
            Ok(application) => {
                tracing::info!(
                    application_id = application.as_ref().map(|a| a.id.as_str()),
                    college_id = %request.college_id,
                    course_id = %request.course_id,
                    "Application submitted"
                );
                self.draft = ApplicationDraft::default();
                self.step = WizardStep::Confirmed;
                self.message = Some(SUBMIT_SUCCESS_MESSAGE.to_string());
                SubmitOutcome::Submitted(application)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting application");
                let message = e.user_message(SUBMIT_FAILURE_MESSAGE);
                self.message = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Submit the draft and wait for the backend
    pub async fn submit(
        &mut self,
        api: &dyn PortalApi,
        session: &Session,
    ) -> Result<SubmitOutcome, WizardError> {
        let ticket = self.begin_submit()?;
        let result = api.submit_application(session, ticket.request()).await;
        Ok(self.finish_submit(ticket, result))
    }
}

/// Whether `name` ends in one of [`ACCEPTED_EXTENSIONS`]
pub fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}
