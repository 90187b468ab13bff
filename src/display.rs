//! Display helpers shared by the dashboards and listings.

use crate::gateway::{ApplicationStatus, AppointmentStatus};

/// Colour family of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// yellow
    Warning,
    /// blue
    Info,
    /// purple
    Progress,
    /// green
    Success,
    /// red
    Danger,
    /// gray
    Neutral,
}

impl StatusTone {
    /// Tone for a raw status string; unrecognised values are neutral
    pub fn for_status(status: &str) -> Self {
        match status {
            "pending" => StatusTone::Warning,
            "submitted" | "scheduled" => StatusTone::Info,
            "under_review" => StatusTone::Progress,
            "approved" | "completed" => StatusTone::Success,
            "rejected" | "cancelled" => StatusTone::Danger,
            _ => StatusTone::Neutral,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StatusTone::Warning => "yellow",
            StatusTone::Info => "blue",
            StatusTone::Progress => "purple",
            StatusTone::Success => "green",
            StatusTone::Danger => "red",
            StatusTone::Neutral => "gray",
        }
    }
}

/// Badge text: underscores become spaces, upper case
pub fn status_label(status: &str) -> String {
    status.replace('_', " ").to_uppercase()
}

/// Anything rendered as a status badge
pub trait StatusBadge {
    fn status_str(&self) -> &'static str;

    fn tone(&self) -> StatusTone {
        StatusTone::for_status(self.status_str())
    }

    fn label(&self) -> String {
        status_label(self.status_str())
    }
}

impl StatusBadge for ApplicationStatus {
    fn status_str(&self) -> &'static str {
        self.as_str()
    }
}

impl StatusBadge for AppointmentStatus {
    fn status_str(&self) -> &'static str {
        self.as_str()
    }
}

/// Star breakdown of a 0..=5 rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    pub fn new(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, 5.0)
        } else {
            0.0
        };

        Self {
            full: rating.floor() as u8,
            half: rating.fract() != 0.0,
            empty: 5 - rating.ceil() as u8,
        }
    }

    /// Text rendering, e.g. `★★★★☆`
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(15);
        out.extend(std::iter::repeat('★').take(self.full as usize));
        if self.half {
            out.push('☆');
        }
        out.extend(std::iter::repeat('·').take(self.empty as usize));
        out
    }
}

/// Last six characters of a record id, as shown in listings
pub fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &id[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tones() {
        assert_eq!(ApplicationStatus::Pending.tone(), StatusTone::Warning);
        assert_eq!(ApplicationStatus::UnderReview.tone().color(), "purple");
        assert_eq!(AppointmentStatus::Scheduled.tone(), StatusTone::Info);
        assert_eq!(AppointmentStatus::Cancelled.tone(), StatusTone::Danger);
        assert_eq!(ApplicationStatus::Unknown.tone(), StatusTone::Neutral);
        assert_eq!(StatusTone::for_status("withdrawn").color(), "gray");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ApplicationStatus::UnderReview.label(), "UNDER REVIEW");
        assert_eq!(AppointmentStatus::Completed.label(), "COMPLETED");
    }

    #[test]
    fn test_star_breakdown() {
        assert_eq!(
            StarRating::new(4.8),
            StarRating { full: 4, half: true, empty: 0 }
        );
        assert_eq!(
            StarRating::new(3.0),
            StarRating { full: 3, half: false, empty: 2 }
        );
        assert_eq!(StarRating::new(4.5).render(), "★★★★☆");
        assert_eq!(StarRating::new(f64::NAN).empty, 5);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("6710f3a9c2e4b1d8"), "e4b1d8");
        assert_eq!(short_id("abc"), "abc");
    }
}
