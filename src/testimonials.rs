//! Featured testimonials, with a built-in set for when the backend has none.

use crate::gateway::{PortalApi, Testimonial};

fn testimonial(
    id: &str,
    student_name: &str,
    course: &str,
    college: &str,
    message: &str,
    rating: f64,
    photo_url: &str,
) -> Testimonial {
    Testimonial {
        id: id.to_string(),
        student_name: student_name.to_string(),
        course: course.to_string(),
        college: college.to_string(),
        message: message.to_string(),
        rating,
        photo_url: Some(photo_url.to_string()),
        is_featured: true,
    }
}

/// Shown when the backend fails or has nothing featured
pub fn default_testimonials() -> Vec<Testimonial> {
    vec![
        testimonial(
            "1",
            "Rahul Kumar",
            "B.Tech Computer Science",
            "IIT Patna",
            "Edu-Mentor Services made my dream come true! Their guidance helped me secure admission in IIT Patna with scholarship. The counselling team was incredibly supportive throughout the entire process.",
            5.0,
            "https://images.unsplash.com/photo-1577036421869-7c8d388d2123?crop=entropy&cs=srgb&fm=jpg&ixlib=rb-4.1.0&q=85",
        ),
        testimonial(
            "2",
            "Priya Singh",
            "B.Pharma",
            "BIT Mesra",
            "Thanks to Edu-Mentor, I not only got admission but also received a merit scholarship. Their knowledge about the Bihar Student Credit Card scheme was invaluable for my family.",
            5.0,
            "https://images.unsplash.com/photo-1628887590815-2860da1c2900?crop=entropy&cs=srgb&fm=jpg&ixlib=rb-4.1.0&q=85",
        ),
        testimonial(
            "3",
            "Amit Sharma",
            "BPT (Physiotherapy)",
            "Patna Medical College",
            "The team at Edu-Mentor provided excellent career counselling. They helped me understand different healthcare career options and choose the best path for my future.",
            4.8,
            "https://images.unsplash.com/photo-1628887590437-940b8e74e43a?crop=entropy&cs=srgb&fm=jpg&ixlib=rb-4.1.0&q=85",
        ),
        testimonial(
            "4",
            "Sneha Kumari",
            "BHMS",
            "Government Homeopathy College",
            "Excellent service! They guided me through the entire admission process for BHMS and helped with all documentation. Highly recommended for medical course aspirants.",
            4.9,
            "https://images.pexels.com/photos/7699527/pexels-photo-7699527.jpeg",
        ),
    ]
}

/// Featured testimonials, falling back to [`default_testimonials`]
pub async fn featured_or_default(api: &dyn PortalApi) -> Vec<Testimonial> {
    match api.featured_testimonials().await {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => {
            tracing::debug!("No featured testimonials, using defaults");
            default_testimonials()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching testimonials");
            default_testimonials()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::{Failure, FakePortal};

    #[tokio::test]
    async fn test_empty_list_uses_defaults() {
        let api = FakePortal::new();
        let list = featured_or_default(&api).await;
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].student_name, "Rahul Kumar");
    }

    #[tokio::test]
    async fn test_failure_uses_defaults() {
        let api = FakePortal::new();
        api.fail("featured_testimonials", Failure::Api(500, None));
        assert_eq!(featured_or_default(&api).await, default_testimonials());
    }

    #[tokio::test]
    async fn test_backend_list_wins() {
        let mut api = FakePortal::new();
        api.testimonials = vec![testimonial("t9", "Kavya", "BAMS", "Ayurveda College", "Great", 4.5, "")];

        let list = featured_or_default(&api).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].student_name, "Kavya");
    }
}
