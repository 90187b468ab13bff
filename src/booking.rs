//! Appointment booking.
//!
//! Students pick a date inside the booking window, one of the fixed
//! half-hour slots, and a consultation purpose. Submission follows the same
//! one-in-flight rule as the application wizard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::form::{require, FormError};
use crate::gateway::{Appointment, AppointmentRequest, GatewayError, PortalApi};
use crate::session::Session;

/// Slot start times offered for counselling sessions
pub const TIME_SLOTS: &[&str] = &[
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
    "18:00", "18:30",
];

pub const PURPOSES: &[&str] = &[
    "Career Counselling",
    "College Selection",
    "Application Assistance",
    "Bihar Student Credit Card Guidance",
    "Scholarship Information",
    "Document Verification",
    "General Inquiry",
];

/// How far ahead an appointment can be booked
pub const BOOKING_HORIZON_DAYS: u64 = 30;

pub const BOOKING_SUCCESS_MESSAGE: &str =
    "Appointment booked successfully! We will confirm your appointment soon.";
pub const BOOKING_FAILURE_MESSAGE: &str = "Failed to book appointment. Please try again.";

/// First and last bookable day (inclusive) relative to `today`
pub fn booking_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = today.checked_add_days(Days::new(1)).unwrap_or(today);
    let latest = today
        .checked_add_days(Days::new(BOOKING_HORIZON_DAYS))
        .unwrap_or(today);
    (earliest, latest)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub date: Option<NaiveDate>,
    pub time: String,
    pub purpose: String,
    pub notes: String,
}

impl AppointmentForm {
    pub fn validate(&self, today: NaiveDate) -> Result<AppointmentRequest, FormError> {
        let date = self.date.ok_or(FormError::Missing("Date"))?;
        let (earliest, latest) = booking_window(today);
        if date < earliest || date > latest {
            return Err(FormError::DateOutsideWindow { earliest, latest });
        }

        require("Time", &self.time)?;
        if !TIME_SLOTS.contains(&self.time.as_str()) {
            return Err(FormError::UnknownTimeSlot(self.time.clone()));
        }

        require("Purpose", &self.purpose)?;
        if !PURPOSES.contains(&self.purpose.as_str()) {
            return Err(FormError::UnknownPurpose(self.purpose.clone()));
        }

        let notes = self.notes.trim();

        Ok(AppointmentRequest {
            appointment_date: date,
            appointment_time: self.time.clone(),
            purpose: self.purpose.clone(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("A booking is already in progress")]
    InFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Option<Appointment>),
    Failed(String),
}

/// Booking form plus its submission state
#[derive(Debug, Default)]
pub struct AppointmentBooking {
    pub form: AppointmentForm,
    in_flight: Arc<AtomicBool>,
    message: Option<String>,
}

/// Outstanding booking; dropping it releases the in-flight guard
#[derive(Debug)]
#[must_use]
pub struct BookingTicket {
    request: AppointmentRequest,
    in_flight: Arc<AtomicBool>,
}

impl BookingTicket {
    pub fn request(&self) -> &AppointmentRequest {
        &self.request
    }
}

impl Drop for BookingTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl AppointmentBooking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn begin_submit(&mut self, today: NaiveDate) -> Result<BookingTicket, BookingError> {
        if self.is_submitting() {
            return Err(BookingError::InFlight);
        }

        let request = self.form.validate(today)?;
        self.in_flight.store(true, Ordering::Release);
        self.message = None;
        Ok(BookingTicket {
            request,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn finish_submit(
        &mut self,
        ticket: BookingTicket,
        result: Result<Option<Appointment>, GatewayError>,
    ) -> BookingOutcome {
        match result {
            Ok(appointment) => {
                tracing::info!(
                    appointment_id = appointment.as_ref().map(|a| a.id.as_str()),
                    date = %ticket.request.appointment_date,
                    time = %ticket.request.appointment_time,
                    "Appointment booked"
                );
                self.form = AppointmentForm::default();
                self.message = Some(BOOKING_SUCCESS_MESSAGE.to_string());
                BookingOutcome::Booked(appointment)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error booking appointment");
                let message = e.user_message(BOOKING_FAILURE_MESSAGE);
                self.message = Some(message.clone());
                BookingOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn PortalApi,
        session: &Session,
        today: NaiveDate,
    ) -> Result<BookingOutcome, BookingError> {
        let ticket = self.begin_submit(today)?;
        let result = api.book_appointment(session, ticket.request()).await;
        Ok(self.finish_submit(ticket, result))
    }
}
