//! Row types returned by the dashboard resources
//!
//! Field names follow the REST payloads (camelCase on the wire).

use serde::{Deserialize, Serialize};

use crate::paging::Row;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    Open,
    Closed,
    Draft,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub country: String,
    pub city: String,
    pub employment_type: EmploymentType,
    pub status: JobStatus,
    #[serde(default)]
    pub salary: Option<String>,
    pub posted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub job_title: String,
    pub applicant_name: String,
    pub status: ApplicationStatus,
    pub applied_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub candidate_name: String,
    pub job_title: String,
    pub scheduled_at: String,
    /// "Online" or "Onsite"
    pub mode: String,
    pub status: InterviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub candidate_name: String,
    pub job_title: String,
    pub salary: String,
    pub status: OfferStatus,
    pub expires_at: String,
}

impl Row for Job {
    fn row_id(&self) -> &str {
        &self.id
    }
}

impl Row for Application {
    fn row_id(&self) -> &str {
        &self.id
    }
}

impl Row for Interview {
    fn row_id(&self) -> &str {
        &self.id
    }
}

impl Row for Offer {
    fn row_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserializes_camel_case_payload() {
        let json = r#"{
            "id": "j1",
            "title": "Backend Engineer",
            "companyName": "Acme",
            "country": "France",
            "city": "Lyon",
            "employmentType": "FullTime",
            "status": "Open",
            "postedAt": "2025-10-01"
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.company_name, "Acme");
        assert_eq!(job.employment_type, EmploymentType::FullTime);
        assert!(job.salary.is_none());
        assert_eq!(job.row_id(), "j1");
    }

    #[test]
    fn test_application_status_wire_names() {
        let json = serde_json::to_string(&ApplicationStatus::Accepted).unwrap();
        assert_eq!(json, "\"Accepted\"");
    }
}
