use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dse::grade::Grade;

/// Subjects every DSE candidate is graded in, in scoring order.
pub const CORE_SUBJECTS: [&str; 4] = ["English", "Chinese", "Mathematics", "Liberal Studies"];

pub const ELECTIVE_SUBJECTS: [&str; 11] = [
    "Physics",
    "Chemistry",
    "Biology",
    "Economics",
    "BAFS",
    "Geography",
    "History",
    "Chinese History",
    "ICT",
    "M1",
    "M2",
];

pub const ELECTIVE_COUNT: usize = 2;

pub fn is_core_subject(subject: &str) -> bool {
    CORE_SUBJECTS.contains(&subject)
}

pub fn is_elective_subject(subject: &str) -> bool {
    ELECTIVE_SUBJECTS.contains(&subject)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoresError {
    #[error("missing required subject scores: no grade for {0}")]
    MissingCore(String),

    #[error("missing required subject scores: no grade for elective {0}")]
    MissingElective(String),

    #[error("missing required subject scores: expected 2 electives, got {0}")]
    ElectiveCount(usize),

    #[error("elective {0} was chosen twice")]
    DuplicateElective(String),

    #[error("'{0}' is not a DSE elective subject")]
    UnknownElective(String),

    #[error("invalid grade '{grade}' for {subject}")]
    InvalidGrade { subject: String, grade: String },
}

/// Grades as submitted by a form: subject name to grade token, plus the two
/// chosen electives. Blank grade tokens count as not yet selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoresInput {
    pub scores: BTreeMap<String, String>,
    pub electives: Vec<String>,
}

impl ScoresInput {
    pub fn validate(&self) -> Result<StudentScores, ScoresError> {
        StudentScores::parse(&self.scores, &self.electives)
    }
}

/// A complete set of DSE results: all four core subjects plus exactly two
/// distinct electives. Only constructible through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentScores {
    core: [Grade; 4],
    electives: [(String, Grade); ELECTIVE_COUNT],
}

impl StudentScores {
    /// Parses raw grade tokens for the core subjects and the chosen electives.
    /// Entries for other subjects are ignored.
    pub fn parse(
        scores: &BTreeMap<String, String>,
        electives: &[String],
    ) -> Result<Self, ScoresError> {
        let mut grades = BTreeMap::new();
        for (subject, token) in scores {
            if token.trim().is_empty() {
                continue;
            }
            if !is_core_subject(subject) && !electives.contains(subject) {
                continue;
            }
            let grade = token
                .parse::<Grade>()
                .map_err(|_| ScoresError::InvalidGrade {
                    subject: subject.clone(),
                    grade: token.clone(),
                })?;
            grades.insert(subject.clone(), grade);
        }
        Self::from_grades(&grades, electives)
    }

    pub fn from_grades(
        grades: &BTreeMap<String, Grade>,
        electives: &[String],
    ) -> Result<Self, ScoresError> {
        let mut core = [Grade::Unclassified; 4];
        for (slot, subject) in core.iter_mut().zip(CORE_SUBJECTS) {
            *slot = *grades
                .get(subject)
                .ok_or_else(|| ScoresError::MissingCore(subject.to_string()))?;
        }

        let [first, second] = electives else {
            return Err(ScoresError::ElectiveCount(electives.len()));
        };
        if first == second {
            return Err(ScoresError::DuplicateElective(first.clone()));
        }

        let graded = |subject: &String| -> Result<(String, Grade), ScoresError> {
            if !is_elective_subject(subject) {
                return Err(ScoresError::UnknownElective(subject.clone()));
            }
            let grade = grades
                .get(subject)
                .ok_or_else(|| ScoresError::MissingElective(subject.clone()))?;
            Ok((subject.clone(), *grade))
        };

        Ok(StudentScores {
            core,
            electives: [graded(first)?, graded(second)?],
        })
    }

    /// Rebuilds scores from a stored flat map, treating every non-core
    /// subject as one of the electives.
    pub fn from_profile(grades: &BTreeMap<String, Grade>) -> Result<Self, ScoresError> {
        let electives: Vec<String> = grades
            .keys()
            .filter(|s| !is_core_subject(s))
            .cloned()
            .collect();
        Self::from_grades(grades, &electives)
    }

    pub fn core(&self) -> impl Iterator<Item = (&'static str, Grade)> + '_ {
        CORE_SUBJECTS.into_iter().zip(self.core.iter().copied())
    }

    pub fn electives(&self) -> impl Iterator<Item = (&str, Grade)> + '_ {
        self.electives.iter().map(|(s, g)| (s.as_str(), *g))
    }

    pub fn has_elective(&self, subject: &str) -> bool {
        self.electives.iter().any(|(s, _)| s == subject)
    }

    /// Flat subject-to-grade form, as stored on a user profile.
    pub fn to_flat(&self) -> BTreeMap<String, Grade> {
        self.core()
            .map(|(s, g)| (s.to_string(), g))
            .chain(self.electives().map(|(s, g)| (s.to_string(), g)))
            .collect()
    }
}
