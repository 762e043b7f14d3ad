use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dse::grade::Grade;

/// Career fields a user (or a job) can belong to.
pub const DISCIPLINES: [&str; 6] = ["Tech", "Business", "Arts", "Science", "Education", "General"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    HighSchool,
    UniPostgrad,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::HighSchool => "high_school",
            UserType::UniPostgrad => "uni_postgrad",
        }
    }
}

impl FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high_school" => Ok(UserType::HighSchool),
            "uni_postgrad" => Ok(UserType::UniPostgrad),
            other => Err(anyhow::anyhow!("unknown user type '{other}'")),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub user_type: UserType,
    /// Flat subject-to-grade map of a complete DSE result set.
    pub dse_scores: Option<BTreeMap<String, Grade>>,
    pub discipline: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: String, user_type: UserType) -> Self {
        User {
            id: Uuid::new_v4(),
            email,
            user_type,
            dse_scores: None,
            discipline: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}
