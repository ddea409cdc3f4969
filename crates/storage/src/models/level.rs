use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Tier reached by a single discipline result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum Level {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "bronze")]
    Bronze,
    #[serde(rename = "silber")]
    Silver,
    #[serde(rename = "gold")]
    Gold,
}

impl Level {
    /// Tiers in the order thresholds are checked.
    pub const BEST_FIRST: [Level; 3] = [Level::Gold, Level::Silver, Level::Bronze];

    pub fn points(&self) -> i32 {
        match self {
            Level::None => 0,
            Level::Bronze => 1,
            Level::Silver => 2,
            Level::Gold => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::None => "none",
            Level::Bronze => "bronze",
            Level::Silver => "silber",
            Level::Gold => "gold",
        }
    }

    pub fn from_label(label: &str) -> Level {
        match label {
            "gold" => Level::Gold,
            "silber" | "silver" => Level::Silver,
            "bronze" => Level::Bronze,
            _ => Level::None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall award of an exam participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    None,
    Bronze,
    Silver,
    Gold,
}

impl Medal {
    /// Medal for a total, assuming the swimming and completeness gates passed.
    pub fn for_total(total: i32) -> Medal {
        match total {
            t if t >= 11 => Medal::Gold,
            t if t >= 8 => Medal::Silver,
            t if t >= 4 => Medal::Bronze,
            _ => Medal::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::None => "none",
            Medal::Bronze => "bronze",
            Medal::Silver => "silver",
            Medal::Gold => "gold",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_points_and_labels() {
        assert_eq!(Level::Gold.points(), 3);
        assert_eq!(Level::Silver.label(), "silber");
        assert_eq!(Level::from_label("silber"), Level::Silver);
        assert_eq!(Level::from_label("garbage"), Level::None);
    }

    #[test]
    fn test_medal_boundaries() {
        assert_eq!(Medal::for_total(12), Medal::Gold);
        assert_eq!(Medal::for_total(11), Medal::Gold);
        assert_eq!(Medal::for_total(10), Medal::Silver);
        assert_eq!(Medal::for_total(8), Medal::Silver);
        assert_eq!(Medal::for_total(7), Medal::Bronze);
        assert_eq!(Medal::for_total(4), Medal::Bronze);
        assert_eq!(Medal::for_total(3), Medal::None);
    }
}
