use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single DSE subject grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "5**")]
    FiveStarStar,
    #[serde(rename = "5*")]
    FiveStar,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "U")]
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown DSE grade '{0}'")]
pub struct UnknownGrade(pub String);

impl Grade {
    /// Every grade in display order (best first).
    pub const ALL: [Grade; 8] = [
        Grade::FiveStarStar,
        Grade::FiveStar,
        Grade::Five,
        Grade::Four,
        Grade::Three,
        Grade::Two,
        Grade::One,
        Grade::Unclassified,
    ];

    /// Point value used in aggregate scoring.
    pub const fn points(self) -> u8 {
        match self {
            Grade::FiveStarStar => 7,
            Grade::FiveStar => 6,
            Grade::Five => 5,
            Grade::Four => 4,
            Grade::Three => 3,
            Grade::Two => 2,
            Grade::One => 1,
            Grade::Unclassified => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Grade::FiveStarStar => "5**",
            Grade::FiveStar => "5*",
            Grade::Five => "5",
            Grade::Four => "4",
            Grade::Three => "3",
            Grade::Two => "2",
            Grade::One => "1",
            Grade::Unclassified => "U",
        }
    }
}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5**" => Ok(Grade::FiveStarStar),
            "5*" => Ok(Grade::FiveStar),
            "5" => Ok(Grade::Five),
            "4" => Ok(Grade::Four),
            "3" => Ok(Grade::Three),
            "2" => Ok(Grade::Two),
            "1" => Ok(Grade::One),
            "U" | "u" => Ok(Grade::Unclassified),
            other => Err(UnknownGrade(other.to_string())),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
