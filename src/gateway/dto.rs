//! Portal Data Transfer Objects
//!
//! Wire shapes exchanged with the portal backend. Field names follow the
//! backend's JSON exactly; optional or late-added fields carry serde defaults
//! so older payloads still decode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// Users & Auth
// ============================================

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Counsellor,
    Admin,
    /// Any role this client does not know yet
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Counsellor => "counsellor",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }
}

/// Cached copy of the signed-in user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    /// First and last name joined, or just the first name
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Successful login or registration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// ============================================
// Catalogue
// ============================================

/// A college as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct College {
    pub id: String,
    pub name: String,
    pub location: String,
    pub state: String,
    /// Course-type labels offered here, e.g. "B.Tech"
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub fees_range: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub established_year: Option<i32>,
}

impl College {
    /// Whether this college offers the given course-type label
    pub fn offers(&self, course_type: &str) -> bool {
        self.courses.iter().any(|c| c == course_type)
    }
}

/// A course programme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub course_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub career_opportunities: Vec<String>,
}

// ============================================
// Applications
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Unknown => "unknown",
        }
    }
}

/// Body of `POST /api/applications`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRequest {
    pub college_id: String,
    pub course_id: String,
    pub documents: Vec<String>,
    pub notes: String,
}

/// A persisted application record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(default)]
    pub student_id: String,
    pub college_id: String,
    pub course_id: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub applied_date: Option<NaiveDate>,
}

// ============================================
// Appointments
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Pending,
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Unknown => "unknown",
        }
    }
}

/// Body of `POST /api/appointments`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentRequest {
    pub appointment_date: NaiveDate,
    /// Slot start, "HH:MM"
    pub appointment_time: String,
    pub purpose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub counsellor_id: Option<String>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub purpose: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================
// Enquiries
// ============================================

/// Body of `POST /api/enquiries`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ============================================
// Admin & Marketing
// ============================================

/// Aggregate counters from `GET /api/admin/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_applications: u64,
    #[serde(default)]
    pub total_colleges: u64,
    #[serde(default)]
    pub pending_enquiries: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub student_name: String,
    pub course: String,
    pub college: String,
    pub message: String,
    pub rating: f64,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_decodes() {
        let status: ApplicationStatus = serde_json::from_str(r#""withdrawn""#).unwrap();
        assert_eq!(status, ApplicationStatus::Unknown);

        let status: ApplicationStatus = serde_json::from_str(r#""under_review""#).unwrap();
        assert_eq!(status, ApplicationStatus::UnderReview);
    }

    #[test]
    fn test_auth_response_without_last_name() {
        let body = r#"{
            "message": "Login successful",
            "access_token": "abc",
            "token_type": "bearer",
            "user": {"id": "u1", "email": "a@b.in", "first_name": "Asha", "role": "admin"}
        }"#;

        let auth: AuthResponse = serde_json::from_str(body).unwrap();
        assert_eq!(auth.access_token, "abc");
        assert_eq!(auth.user.last_name, None);
        assert!(auth.user.is_admin());
        assert_eq!(auth.user.display_name(), "Asha");
    }

    #[test]
    fn test_new_role_still_signs_in() {
        let body = r#"{
            "message": "Login successful",
            "access_token": "abc",
            "token_type": "bearer",
            "user": {"id": "u2", "email": "m@b.in", "first_name": "Meera", "role": "mentor"}
        }"#;

        let auth: AuthResponse = serde_json::from_str(body).unwrap();
        assert_eq!(auth.user.role, Role::Unknown);
        assert_eq!(auth.user.role.as_str(), "unknown");
        assert!(!auth.user.is_admin());
    }

    #[test]
    fn test_college_offers() {
        let college = College {
            id: "c1".into(),
            name: "ABC Institute".into(),
            location: "Patna".into(),
            state: "Bihar".into(),
            courses: vec!["B.Tech".into(), "Diploma".into()],
            fees_range: String::new(),
            rating: 4.5,
            description: String::new(),
            established_year: Some(1990),
        };

        assert!(college.offers("Diploma"));
        assert!(!college.offers("BHMS"));
        assert!(!college.offers("b.tech"));
    }

    #[test]
    fn test_appointment_request_omits_empty_notes() {
        let request = AppointmentRequest {
            appointment_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            appointment_time: "09:30".into(),
            purpose: "College Selection".into(),
            notes: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["appointment_date"], "2026-10-20");
        assert!(json.get("notes").is_none());
    }
}
