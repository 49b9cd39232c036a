//! Column sets of the four dashboards

use libtalentgrid::types::{Application, Interview, Job, Offer};

use super::table::Column;

fn location(job: &Job) -> String {
    format!("{}, {}", job.country, job.city)
}

fn salary(job: &Job) -> String {
    job.salary.clone().unwrap_or_else(|| "-".to_string())
}

pub fn jobs() -> Vec<Column<Job>> {
    vec![
        Column::field("title", "Title", 22),
        Column::field("companyName", "Company", 12),
        Column::computed("location", "Location", 18, location),
        Column::field("employmentType", "Type", 11),
        Column::computed("salary", "Salary", 8, salary),
        Column::field("status", "Status", 8),
        Column::field("postedAt", "Posted", 10),
    ]
}

pub fn applications() -> Vec<Column<Application>> {
    vec![
        Column::field("applicantName", "Applicant", 18),
        Column::field("jobTitle", "Job", 22),
        Column::field("status", "Status", 10),
        Column::field("appliedAt", "Applied", 10),
    ]
}

pub fn interviews() -> Vec<Column<Interview>> {
    vec![
        Column::field("candidateName", "Candidate", 18),
        Column::field("jobTitle", "Job", 22),
        Column::field("scheduledAt", "When", 16),
        Column::field("mode", "Mode", 7),
        Column::field("status", "Status", 10),
    ]
}

pub fn offers() -> Vec<Column<Offer>> {
    vec![
        Column::field("candidateName", "Candidate", 18),
        Column::field("jobTitle", "Job", 22),
        Column::field("salary", "Salary", 8),
        Column::field("status", "Status", 9),
        Column::field("expiresAt", "Expires", 10),
    ]
}
