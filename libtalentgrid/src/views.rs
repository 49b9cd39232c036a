//! Dashboard views and their filter selections

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TalentError;
use crate::paging::filters::{apply, Filters};
use crate::types::{ApplicationStatus, EmploymentType, InterviewStatus, JobStatus, OfferStatus};

/// The paginated dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Jobs,
    Applications,
    Interviews,
    Offers,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Jobs,
        ViewKind::Applications,
        ViewKind::Interviews,
        ViewKind::Offers,
    ];

    /// Identifier used in logs, notices and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Jobs => "jobs",
            ViewKind::Applications => "applications",
            ViewKind::Interviews => "interviews",
            ViewKind::Offers => "offers",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Jobs => "Jobs",
            ViewKind::Applications => "Applications",
            ViewKind::Interviews => "Interviews",
            ViewKind::Offers => "Offers",
        }
    }

    /// Specific message for a missing resource, where the dashboard has one
    pub fn not_found_message(&self) -> Option<&'static str> {
        match self {
            ViewKind::Interviews => Some("Interview schedule is not available."),
            ViewKind::Offers => Some("Offer is no longer available."),
            ViewKind::Jobs | ViewKind::Applications => None,
        }
    }
}

impl FromStr for ViewKind {
    type Err = TalentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jobs" => Ok(ViewKind::Jobs),
            "applications" => Ok(ViewKind::Applications),
            "interviews" => Ok(ViewKind::Interviews),
            "offers" => Ok(ViewKind::Offers),
            _ => Err(TalentError::InvalidInput(format!(
                "Unknown view '{}'. Valid views: jobs, applications, interviews, offers",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Newest,
        }
    }
}

// ============================================================================
// Jobs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    pub status: Option<JobStatus>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub sort: SortOrder,
}

/// `Some(None)` clears a selection, `None` keeps it
#[derive(Debug, Clone, Default)]
pub struct JobFilterPatch {
    pub status: Option<Option<JobStatus>>,
    pub title: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub employment_type: Option<Option<EmploymentType>>,
    pub sort: Option<SortOrder>,
}

impl Filters for JobFilters {
    type Patch = JobFilterPatch;

    fn merge(&mut self, patch: JobFilterPatch) {
        apply(&mut self.status, patch.status);
        apply(&mut self.title, patch.title);
        apply(&mut self.location, patch.location);
        apply(&mut self.employment_type, patch.employment_type);
        apply(&mut self.sort, patch.sort);
    }
}

// ============================================================================
// Applications
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilters {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<String>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilterPatch {
    pub status: Option<Option<ApplicationStatus>>,
    pub job_id: Option<Option<String>>,
    pub sort: Option<SortOrder>,
}

impl Filters for ApplicationFilters {
    type Patch = ApplicationFilterPatch;

    fn merge(&mut self, patch: ApplicationFilterPatch) {
        apply(&mut self.status, patch.status);
        apply(&mut self.job_id, patch.job_id);
        apply(&mut self.sort, patch.sort);
    }
}

// ============================================================================
// Interviews
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFilters {
    pub status: Option<InterviewStatus>,
    /// Only interviews on or after this date (YYYY-MM-DD)
    pub from_date: Option<String>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct InterviewFilterPatch {
    pub status: Option<Option<InterviewStatus>>,
    pub from_date: Option<Option<String>>,
    pub sort: Option<SortOrder>,
}

impl Filters for InterviewFilters {
    type Patch = InterviewFilterPatch;

    fn merge(&mut self, patch: InterviewFilterPatch) {
        apply(&mut self.status, patch.status);
        apply(&mut self.from_date, patch.from_date);
        apply(&mut self.sort, patch.sort);
    }
}

// ============================================================================
// Offers
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferFilters {
    pub status: Option<OfferStatus>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct OfferFilterPatch {
    pub status: Option<Option<OfferStatus>>,
    pub sort: Option<SortOrder>,
}

impl Filters for OfferFilters {
    type Patch = OfferFilterPatch;

    fn merge(&mut self, patch: OfferFilterPatch) {
        apply(&mut self.status, patch.status);
        apply(&mut self.sort, patch.sort);
    }
}

/// Next value in a status filter cycle: all → each status → all
pub fn cycle_status<S: Copy + PartialEq>(current: Option<S>, all: &[S]) -> Option<S> {
    match current {
        None => all.first().copied(),
        Some(status) => {
            let position = all.iter().position(|s| *s == status);
            match position {
                Some(i) if i + 1 < all.len() => Some(all[i + 1]),
                _ => None,
            }
        }
    }
}

pub const JOB_STATUSES: [JobStatus; 3] = [JobStatus::Open, JobStatus::Closed, JobStatus::Draft];

pub const APPLICATION_STATUSES: [ApplicationStatus; 4] = [
    ApplicationStatus::Pending,
    ApplicationStatus::Reviewed,
    ApplicationStatus::Accepted,
    ApplicationStatus::Rejected,
];

pub const INTERVIEW_STATUSES: [InterviewStatus; 3] = [
    InterviewStatus::Scheduled,
    InterviewStatus::Completed,
    InterviewStatus::Cancelled,
];

pub const OFFER_STATUSES: [OfferStatus; 3] = [
    OfferStatus::Pending,
    OfferStatus::Accepted,
    OfferStatus::Declined,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_patch_merges_only_present_fields() {
        let mut filters = JobFilters {
            title: Some("Rust".to_string()),
            ..Default::default()
        };

        filters.merge(JobFilterPatch {
            status: Some(Some(JobStatus::Open)),
            ..Default::default()
        });

        assert_eq!(filters.status, Some(JobStatus::Open));
        assert_eq!(filters.title.as_deref(), Some("Rust"));

        filters.merge(JobFilterPatch {
            title: Some(None),
            ..Default::default()
        });
        assert!(filters.title.is_none());
        assert_eq!(filters.status, Some(JobStatus::Open));
    }

    #[test]
    fn test_job_filters_query_pairs() {
        let filters = JobFilters {
            status: Some(JobStatus::Open),
            location: Some("Lyon".to_string()),
            employment_type: Some(EmploymentType::FullTime),
            ..Default::default()
        };

        let pairs = filters.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("employmentType".to_string(), "FullTime".to_string()),
                ("location".to_string(), "Lyon".to_string()),
                ("sort".to_string(), "newest".to_string()),
                ("status".to_string(), "Open".to_string()),
            ]
        );
    }

    #[test]
    fn test_view_kind_from_str() {
        assert_eq!("Jobs".parse::<ViewKind>().unwrap(), ViewKind::Jobs);
        assert_eq!("offers".parse::<ViewKind>().unwrap(), ViewKind::Offers);

        let err = "dialogs".parse::<ViewKind>().unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_cycle_status_wraps_to_all() {
        let all = OFFER_STATUSES;
        let mut current = None;
        current = cycle_status(current, &all);
        assert_eq!(current, Some(OfferStatus::Pending));
        current = cycle_status(current, &all);
        current = cycle_status(current, &all);
        assert_eq!(current, Some(OfferStatus::Declined));
        current = cycle_status(current, &all);
        assert_eq!(current, None);
    }

    #[test]
    fn test_sort_toggle() {
        assert_eq!(SortOrder::Newest.toggled(), SortOrder::Oldest);
        assert_eq!(SortOrder::Oldest.toggled(), SortOrder::Newest);
    }
}
