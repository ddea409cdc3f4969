use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Discipline category of the badge.
///
/// The four fitness pillars each contribute up to three points; swimming is a
/// separate requirement that only gates the medal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Endurance,
    Strength,
    Speed,
    Coordination,
    Swimming,
}

impl Category {
    /// The categories summed into the total score, in display order.
    pub const FITNESS: [Category; 4] = [
        Category::Endurance,
        Category::Strength,
        Category::Speed,
        Category::Coordination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Endurance => "endurance",
            Category::Strength => "strength",
            Category::Speed => "speed",
            Category::Coordination => "coordination",
            Category::Swimming => "swimming",
        }
    }

    pub fn is_fitness(&self) -> bool {
        !matches!(self, Category::Swimming)
    }

    /// Categories whose disciplines own a swimming proof that can only be
    /// withdrawn by clearing the result itself.
    pub fn is_foundational(&self) -> bool {
        matches!(self, Category::Endurance | Category::Speed)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the English identifiers as well as the German names used by
    /// the official requirement tables.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "endurance" | "ausdauer" => Ok(Category::Endurance),
            "strength" | "kraft" => Ok(Category::Strength),
            "speed" | "schnelligkeit" => Ok(Category::Speed),
            "coordination" | "koordination" => Ok(Category::Coordination),
            "swimming" | "schwimmen" => Ok(Category::Swimming),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
