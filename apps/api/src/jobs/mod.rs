//! Job board: the bundled postings, company responsiveness stats, and the
//! per-user-type filters applied when listing or searching.

pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::models::job::{CompanyStats, Job};
use crate::models::user::UserType;

const BUNDLED_JOBS: &str = include_str!("../../data/jobs.json");

/// Title fragments that mark a posting as open to school leavers.
const ENTRY_LEVEL_MARKERS: [&str; 2] = ["intern", "junior"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobBoard {
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub company_stats: Vec<CompanyStats>,
}

impl JobBoard {
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_JOBS)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, id: i64) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn stats_for(&self, company: &str) -> Option<&CompanyStats> {
        self.company_stats.iter().find(|s| s.company == company)
    }
}

fn is_entry_level(job: &Job) -> bool {
    let title = job.title.to_lowercase();
    ENTRY_LEVEL_MARKERS.iter().any(|m| title.contains(m)) || job.discipline == "Education"
}

/// Postings relevant to a user. High school users see entry-level and
/// education roles; university users with a discipline see that discipline.
/// Anyone else sees everything.
pub fn list_jobs<'a>(
    jobs: &'a [Job],
    user_type: Option<UserType>,
    discipline: Option<&str>,
) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| match (user_type, discipline) {
            (Some(UserType::HighSchool), _) => is_entry_level(job),
            (Some(UserType::UniPostgrad), Some(d)) => job.discipline == d,
            _ => true,
        })
        .collect()
}

/// `list_jobs`, narrowed to postings whose title, company or description
/// contains `term` (case-insensitive). A blank term narrows nothing.
pub fn search_jobs<'a>(
    jobs: &'a [Job],
    term: &str,
    user_type: Option<UserType>,
    discipline: Option<&str>,
) -> Vec<&'a Job> {
    let filtered = list_jobs(jobs, user_type, discipline);
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return filtered;
    }
    filtered
        .into_iter()
        .filter(|job| {
            [&job.title, &job.company, &job.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}
