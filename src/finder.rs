//! College Finder
//!
//! Filters the college catalogue by three independent predicates:
//! - `state`: case-insensitive substring of the college's state
//! - `course_type`: exact membership in the college's course-type labels
//! - `search`: case-insensitive substring of the name or the location
//!
//! A blank predicate matches everything. The filtered view is recomputed on
//! every change and keeps catalogue order.

use serde::{Deserialize, Serialize};

use crate::gateway::{College, PortalApi};
use crate::scope::ViewScope;

/// Current filter inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeFilter {
    pub state: String,
    pub course_type: String,
    pub search: String,
}

impl CollegeFilter {
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.course_type.is_empty() && self.search.is_empty()
    }

    pub fn matches(&self, college: &College) -> bool {
        let state_ok = self.state.is_empty() || contains_ignore_case(&college.state, &self.state);

        let course_ok = self.course_type.is_empty() || college.offers(&self.course_type);

        let search_ok = self.search.is_empty()
            || contains_ignore_case(&college.name, &self.search)
            || contains_ignore_case(&college.location, &self.search);

        state_ok && course_ok && search_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub struct CollegeFinder {
    colleges: Vec<College>,
    filter: CollegeFilter,
    /// Indices into `colleges` that pass `filter`
    visible: Vec<usize>,
    load_error: Option<String>,
}

impl CollegeFinder {
    pub fn new(colleges: Vec<College>) -> Self {
        let mut finder = Self {
            colleges,
            filter: CollegeFilter::default(),
            visible: Vec::new(),
            load_error: None,
        };
        finder.recompute();
        finder
    }

    /// Fetch the catalogue. A failed fetch is logged and leaves the list empty.
    pub async fn load(api: &dyn PortalApi, scope: &ViewScope) -> Option<Self> {
        let result = scope.run(api.list_colleges()).await?;

        Some(match result {
            Ok(colleges) => Self::new(colleges),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching colleges");
                let mut finder = Self::new(Vec::new());
                finder.load_error = Some(e.user_message("Failed to load colleges."));
                finder
            }
        })
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn filter(&self) -> &CollegeFilter {
        &self.filter
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.filter.state = state.into();
        self.recompute();
    }

    pub fn set_course_type(&mut self, course_type: impl Into<String>) {
        self.filter.course_type = course_type.into();
        self.recompute();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.recompute();
    }

    pub fn set_filter(&mut self, filter: CollegeFilter) {
        self.filter = filter;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(CollegeFilter::default());
    }

    pub fn filtered(&self) -> Vec<&College> {
        self.visible.iter().map(|&i| &self.colleges[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Result count line shown above the list
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} colleges",
            self.visible.len(),
            self.colleges.len()
        )
    }

    /// Distinct states in catalogue order, for the state dropdown
    pub fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = Vec::new();
        for college in &self.colleges {
            if !states.contains(&college.state.as_str()) {
                states.push(&college.state);
            }
        }
        states
    }

    fn recompute(&mut self) {
        self.visible = self
            .colleges
            .iter()
            .enumerate()
            .filter(|(_, c)| self.filter.matches(c))
            .map(|(i, _)| i)
            .collect();

        tracing::trace!(
            visible = self.visible.len(),
            total = self.colleges.len(),
            "Recomputed college filter"
        );
    }
}
