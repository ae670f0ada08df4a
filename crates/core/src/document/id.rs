//! Dashboard and module identifiers.
//!
//! Both dashboard ids and module guids are five hyphen-separated
//! alphanumeric segments, which is the shape of a hyphenated UUID:
//! `0b6f5a3e-9a52-4f6c-8d0e-4b1b2f0c6a11`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GUID_PATTERN: &str =
    r"^[a-zA-Z0-9]+-[a-zA-Z0-9]+-[a-zA-Z0-9]+-[a-zA-Z0-9]+-[a-zA-Z0-9]+$";

static GUID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GUID_PATTERN).expect("valid regex"));

/// Compiled form of [`GUID_PATTERN`].
pub fn guid_regex() -> &'static Regex {
    &GUID_RE
}

pub fn is_guid(s: &str) -> bool {
    GUID_RE.is_match(s)
}

/// Server-assigned dashboard id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardId(String);

impl DashboardId {
    /// Mint a fresh id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Accept an existing id if it has the five-segment shape.
    pub fn parse(s: &str) -> Option<Self> {
        is_guid(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DashboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
