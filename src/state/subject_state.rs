use std::fmt;

/// Lifecycle of one subject within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectState {
    /// Waiting for a slot in the subject pool
    Pending,

    /// Search, stats and comment collection in progress
    Collecting,

    /// Output tables written for this subject
    Completed,

    /// Orchestration raised; the subject is left out of merged output
    Failed,
}

impl SubjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Collecting => "collecting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SubjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
