use serde::{Deserialize, Serialize};
use std::fmt;

/// One record type as reported by the CRM metadata listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,
    pub custom: bool,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, custom: bool) -> Self {
        Self { name: name.into(), custom }
    }

    /// Custom objects whose name ends in one of `suffixes` are scan candidates.
    #[must_use]
    pub fn is_candidate<S: AsRef<str>>(&self, suffixes: &[S]) -> bool {
        self.custom && suffixes.iter().any(|s| self.name.ends_with(s.as_ref()))
    }
}

/// Why a single resource could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FailureReason {
    /// The existence query did not answer in time.
    Timeout,
    /// The CRM rejected the query or the response could not be read.
    Query(String),
    /// The unit of work stopped before producing an answer.
    Aborted(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Query(message) => write!(f, "query failed: {message}"),
            Self::Aborted(message) => write!(f, "aborted: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ActivityState {
    /// At least one record was modified inside the window.
    Active,
    /// No record was modified inside the window.
    Inactive,
    /// Unknown; never reported as inactive.
    Errored(FailureReason),
}

/// The classification of one resource, produced exactly once per scanned resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOutcome {
    pub resource: String,
    pub state: ActivityState,
}

impl ActivityOutcome {
    pub fn new(resource: impl Into<String>, state: ActivityState) -> Self {
        Self { resource: resource.into(), state }
    }

    pub fn errored(resource: impl Into<String>, reason: FailureReason) -> Self {
        Self::new(resource, ActivityState::Errored(reason))
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, ActivityState::Active)
    }

    #[must_use]
    pub const fn is_inactive(&self) -> bool {
        matches!(self.state, ActivityState::Inactive)
    }

    #[must_use]
    pub const fn is_errored(&self) -> bool {
        matches!(self.state, ActivityState::Errored(_))
    }
}

/// Inactive resource names in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub inactive_objects: Vec<String>,
}

impl ScanResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.inactive_objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inactive_objects.is_empty()
    }
}

impl FromIterator<String> for ScanResult {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self { inactive_objects: iter.into_iter().collect() }
    }
}
