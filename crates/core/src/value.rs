//! Value objects for the audio catalog.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated language code (e.g. `EN-US`). Stored uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Validate and canonicalize a language code.
    ///
    /// Accepts 2-16 characters from `[A-Za-z-]`; the stored form is
    /// uppercase.
    pub fn new(code: &str) -> Result<Self, CoreError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidArgument(
                "language code cannot be empty".into(),
            ));
        }
        if trimmed.len() < 2
            || trimmed.len() > 16
            || !trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        {
            return Err(CoreError::InvalidArgument(format!(
                "invalid language code '{trimmed}'"
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Difficulty level of an audio track (CEFR scale plus `NATIVE`).
///
/// The empty string is a valid "unspecified" level, matching the storage
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Native,
    Unspecified,
}

impl AudioLevel {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            "NATIVE" => Ok(Self::Native),
            "" => Ok(Self::Unspecified),
            other => Err(CoreError::InvalidArgument(format!(
                "invalid audio level '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::Native => "NATIVE",
            Self::Unspecified => "",
        }
    }
}

/// Kind of an audio collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    #[serde(rename = "COURSE")]
    Course,
    #[serde(rename = "PLAYLIST")]
    Playlist,
}

impl CollectionType {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "COURSE" => Ok(Self::Course),
            "PLAYLIST" => Ok(Self::Playlist),
            other => Err(CoreError::InvalidArgument(format!(
                "invalid collection type '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "COURSE",
            Self::Playlist => "PLAYLIST",
        }
    }
}
