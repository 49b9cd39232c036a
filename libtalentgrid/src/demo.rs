//! Sample rows for demo mode and examples

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};

use crate::types::{Application, EmploymentType, Interview, Job, Offer};
use crate::views::{
    ApplicationFilters, InterviewFilters, JobFilters, OfferFilters, SortOrder,
    APPLICATION_STATUSES, INTERVIEW_STATUSES, JOB_STATUSES, OFFER_STATUSES,
};

const TITLES: [&str; 6] = [
    "Backend Engineer",
    "Data Analyst",
    "Product Designer",
    "QA Engineer",
    "DevOps Engineer",
    "Technical Recruiter",
];

const COMPANIES: [&str; 4] = ["Acme", "Globex", "Initech", "Umbrella"];

const PLACES: [(&str, &str); 4] = [
    ("France", "Lyon"),
    ("Germany", "Berlin"),
    ("Spain", "Madrid"),
    ("Canada", "Toronto"),
];

const PEOPLE: [&str; 5] = [
    "Amina Diallo",
    "Jonas Weber",
    "Lucia Romero",
    "Kenji Sato",
    "Priya Nair",
];

fn day(i: usize) -> String {
    let base = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default();
    (base + Days::new((i % 28) as u64))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn jobs(count: usize) -> Vec<Job> {
    (0..count)
        .map(|i| {
            let (country, city) = PLACES[i % PLACES.len()];
            Job {
                id: format!("job-{:03}", i + 1),
                title: TITLES[i % TITLES.len()].to_string(),
                company_name: COMPANIES[i % COMPANIES.len()].to_string(),
                country: country.to_string(),
                city: city.to_string(),
                employment_type: match i % 4 {
                    0 => EmploymentType::FullTime,
                    1 => EmploymentType::PartTime,
                    2 => EmploymentType::Contract,
                    _ => EmploymentType::Internship,
                },
                status: JOB_STATUSES[i % JOB_STATUSES.len()],
                salary: if i % 2 == 0 {
                    Some(format!("{}k", 40 + i))
                } else {
                    None
                },
                posted_at: day(i),
            }
        })
        .collect()
}

pub fn applications(count: usize) -> Vec<Application> {
    (0..count)
        .map(|i| Application {
            id: format!("app-{:03}", i + 1),
            job_id: format!("job-{:03}", (i % 6) + 1),
            job_title: TITLES[i % TITLES.len()].to_string(),
            applicant_name: PEOPLE[i % PEOPLE.len()].to_string(),
            status: APPLICATION_STATUSES[i % APPLICATION_STATUSES.len()],
            applied_at: day(i),
        })
        .collect()
}

pub fn interviews(count: usize) -> Vec<Interview> {
    (0..count)
        .map(|i| Interview {
            id: format!("int-{:03}", i + 1),
            candidate_name: PEOPLE[i % PEOPLE.len()].to_string(),
            job_title: TITLES[i % TITLES.len()].to_string(),
            scheduled_at: format!("{} {:02}:00", day(i), 9 + (i % 8)),
            mode: if i % 2 == 0 { "Online" } else { "Onsite" }.to_string(),
            status: INTERVIEW_STATUSES[i % INTERVIEW_STATUSES.len()],
        })
        .collect()
}

pub fn offers(count: usize) -> Vec<Offer> {
    (0..count)
        .map(|i| Offer {
            id: format!("off-{:03}", i + 1),
            candidate_name: PEOPLE[i % PEOPLE.len()].to_string(),
            job_title: TITLES[i % TITLES.len()].to_string(),
            salary: format!("{}k", 45 + i),
            status: OFFER_STATUSES[i % OFFER_STATUSES.len()],
            expires_at: day(i + 14),
        })
        .collect()
}

fn contains(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(n) if !n.trim().is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
        _ => true,
    }
}

/// Server-side filtering emulation for the jobs resource
pub fn job_matches(job: &Job, filters: &JobFilters) -> bool {
    filters.status.map_or(true, |s| s == job.status)
        && filters.employment_type.map_or(true, |t| t == job.employment_type)
        && contains(&job.title, &filters.title)
        && contains(&format!("{} {}", job.country, job.city), &filters.location)
}

pub fn application_matches(application: &Application, filters: &ApplicationFilters) -> bool {
    filters.status.map_or(true, |s| s == application.status)
        && filters
            .job_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map_or(true, |id| id == application.job_id)
}

pub fn interview_matches(interview: &Interview, filters: &InterviewFilters) -> bool {
    filters.status.map_or(true, |s| s == interview.status)
        && filters
            .from_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map_or(true, |d| interview.scheduled_at.as_str() >= d)
}

pub fn offer_matches(offer: &Offer, filters: &OfferFilters) -> bool {
    filters.status.map_or(true, |s| s == offer.status)
}

/// Order two timestamps of the same format under a sort selection
pub fn by_date(a: &str, b: &str, sort: SortOrder) -> Ordering {
    match sort {
        SortOrder::Newest => b.cmp(a),
        SortOrder::Oldest => a.cmp(b),
    }
}
