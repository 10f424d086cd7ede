//! Pipeline stages and their outcome classification

use std::fmt;

/// One phase of the acquisition pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Retrieving the page
    Fetch,
    /// Extracting title, short summary and publish timestamp
    Basic,
    /// Extracting the long summary and keywords
    Detailed,
    /// Writing the article record
    Persist,
}

impl Stage {
    /// Stable lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Basic => "basic",
            Stage::Detailed => "detailed",
            Stage::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome classification for a stage of one candidate
///
/// `Retry` means the stage failed but budget remains; `Failed` means the stage
/// failed with no budget left (or failed in a non-retriable way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StageStatus {
    /// Not yet evaluated
    #[default]
    Pending,
    /// Stage output accepted
    Success,
    /// Stage output rejected, another attempt is allowed
    Retry,
    /// Stage output rejected, no further attempts
    Failed,
}

impl StageStatus {
    /// Stable lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Success => "success",
            StageStatus::Retry => "retry",
            StageStatus::Failed => "failed",
        }
    }

    /// Whether the stage has exited (successfully or not)
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Success | StageStatus::Failed)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
