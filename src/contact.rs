//! Contact form. Public, no session needed.

use crate::form::{require, require_email, FormError};
use crate::gateway::{Enquiry, EnquiryRequest, PortalApi};

pub const SUBJECTS: &[&str] = &[
    "Career Counselling",
    "College Admission",
    "Bihar Student Credit Card",
    "Scholarship Information",
    "Course Information",
    "General Inquiry",
];

pub const ENQUIRY_SUCCESS_MESSAGE: &str =
    "Thank you! Your enquiry has been submitted successfully. We will contact you soon.";
pub const ENQUIRY_FAILURE_MESSAGE: &str =
    "Sorry, there was an error submitting your enquiry. Please try again or call us directly.";

#[derive(Debug, Clone, PartialEq)]
pub enum EnquiryOutcome {
    /// Accepted; carries the stored record when the backend echoed one
    Sent(Option<Enquiry>),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl EnquiryForm {
    pub fn validate(&self) -> Result<EnquiryRequest, FormError> {
        require("Name", &self.name)?;
        require("Phone", &self.phone)?;
        require_email(&self.email)?;
        require("Subject", &self.subject)?;
        if !SUBJECTS.contains(&self.subject.as_str()) {
            return Err(FormError::UnknownSubject(self.subject.clone()));
        }
        require("Message", &self.message)?;

        Ok(EnquiryRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            subject: self.subject.clone(),
            message: self.message.trim().to_string(),
        })
    }

    /// Send the enquiry.
    ///
    /// Any backend failure shows the same apology; the detail is only logged.
    /// The form is cleared on success and kept on failure.
    pub async fn submit(&mut self, api: &dyn PortalApi) -> Result<EnquiryOutcome, FormError> {
        let request = self.validate()?;

        match api.submit_enquiry(&request).await {
            Ok(enquiry) => {
                tracing::info!(
                    enquiry_id = enquiry.as_ref().map(|e| e.id.as_str()),
                    subject = %request.subject,
                    "Enquiry submitted"
                );
                *self = Self::default();
                Ok(EnquiryOutcome::Sent(enquiry))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting enquiry");
                Ok(EnquiryOutcome::Failed(ENQUIRY_FAILURE_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::{Failure, FakePortal};

    fn filled() -> EnquiryForm {
        EnquiryForm {
            name: "Sunita Devi".into(),
            email: "sunita@example.in".into(),
            phone: "9123456780".into(),
            subject: "Bihar Student Credit Card".into(),
            message: "Is my son eligible?".into(),
        }
    }

    #[test]
    fn test_all_fields_required() {
        let form = EnquiryForm {
            message: " ".into(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(FormError::Missing("Message")));

        let form = EnquiryForm {
            email: "sunita".into(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(FormError::InvalidEmail));
    }

    #[test]
    fn test_subject_from_list() {
        let form = EnquiryForm {
            subject: "Hostel".into(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(FormError::UnknownSubject("Hostel".into())));
    }

    #[tokio::test]
    async fn test_success_clears_form() {
        let api = FakePortal::new();
        let mut form = filled();

        let outcome = form.submit(&api).await.unwrap();
        assert!(matches!(outcome, EnquiryOutcome::Sent(_)));
        assert_eq!(form, EnquiryForm::default());
        assert_eq!(api.enquiries_sent.lock().unwrap()[0].name, "Sunita Devi");
    }

    #[tokio::test]
    async fn test_backend_detail_is_not_shown() {
        let api = FakePortal::new();
        api.fail("submit_enquiry", Failure::Api(422, Some("phone: invalid")));
        let mut form = filled();

        let outcome = form.submit(&api).await.unwrap();
        assert_eq!(outcome, EnquiryOutcome::Failed(ENQUIRY_FAILURE_MESSAGE.into()));
        assert_eq!(form, filled());
    }
}
