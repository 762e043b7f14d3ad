use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub discipline: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub salary: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    /// Likelihood the posting is fraudulent, 0.0 to 1.0.
    pub scam_score: Option<f64>,
}

/// Crowdsourced employer responsiveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStats {
    pub company: String,
    pub response_rate: f64, // 0.0 to 1.0
    pub avg_response_time: String,
}
