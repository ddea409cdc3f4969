use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Gender column of the requirement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Gender assumed when a participant's gender is missing or unrecognized.
    ///
    /// Pending product-owner confirmation; every lookup path goes through
    /// [`Gender::normalize`] so this is the only place to change it.
    pub const DEFAULT: Gender = Gender::Female;

    /// Canonical normalization of free-form gender values.
    ///
    /// Matches on the first letter: `M`/`MALE`/`männlich` → male,
    /// `F`/`W`/`FEMALE`/`weiblich` → female. Anything else falls back to
    /// [`Gender::DEFAULT`].
    pub fn normalize(raw: Option<&str>) -> Gender {
        raw.and_then(Gender::recognize).unwrap_or_else(|| {
            tracing::warn!(
                raw = raw.unwrap_or_default(),
                "Unrecognized gender, defaulting to {}",
                Gender::DEFAULT
            );
            Gender::DEFAULT
        })
    }

    /// Strict variant of [`Gender::normalize`] without the fallback.
    pub fn recognize(raw: &str) -> Option<Gender> {
        match raw.trim().chars().next()?.to_ascii_uppercase() {
            'M' => Some(Gender::Male),
            'F' | 'W' => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
