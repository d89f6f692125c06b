//! Session vocabulary: visitor gender and the two generated image kinds.
//!
//! Both are stored as lowercase text in the database and travel as
//! lowercase strings over the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Gender chosen by the visitor; filters the target catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parse a wire value, rejecting anything outside `male` / `female`.
    ///
    /// Matching is exact: `"Male"` is rejected like any other unknown value.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(CoreError::InvalidGender(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// ImageKind
// ---------------------------------------------------------------------------

/// The two composite images a session can produce, print and download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Profile,
    Talent,
}

impl ImageKind {
    pub const ALL: [ImageKind; 2] = [ImageKind::Profile, ImageKind::Talent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Talent => "talent",
        }
    }

    /// Capitalised label used in user-facing messages.
    pub fn title(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Talent => "Talent",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "profile" => Ok(Self::Profile),
            "talent" => Ok(Self::Talent),
            other => Err(CoreError::InvalidImageKind(other.to_string())),
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Consent
// ---------------------------------------------------------------------------

/// A session may only start once the visitor has agreed to data collection.
pub fn require_consent(consent_agreed: bool) -> Result<(), CoreError> {
    if consent_agreed {
        Ok(())
    } else {
        Err(CoreError::ConsentRequired)
    }
}
