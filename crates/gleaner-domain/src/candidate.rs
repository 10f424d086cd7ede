//! Candidate - a discovered URL undergoing acquisition
//!
//! A candidate owns every piece of state that must survive across stage
//! retries: the attempt counters, the per-stage status, and the keyword list
//! retained from the first parsed detailed attempt. Dropping the candidate
//! discards all of it.

use crate::status::{Stage, StageStatus};
use chrono::{DateTime, Utc};

/// Per-stage attempt caps for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    /// Maximum basic extraction attempts
    pub basic: u32,
    /// Maximum detailed extraction attempts
    pub detailed: u32,
}

impl Default for AttemptBudget {
    fn default() -> Self {
        Self { basic: 3, detailed: 5 }
    }
}

/// A URL moving through the acquisition pipeline
#[derive(Debug, Clone)]
pub struct Candidate {
    url: String,
    discovered_at: DateTime<Utc>,
    budget: AttemptBudget,
    basic_attempts: u32,
    detailed_attempts: u32,
    basic_status: StageStatus,
    detailed_status: StageStatus,
    retained_keywords: Option<Vec<String>>,
}

impl Candidate {
    /// Create a candidate discovered now
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::Candidate;
    /// use gleaner_domain::candidate::AttemptBudget;
    ///
    /// let candidate = Candidate::new("https://example.com/a.html", AttemptBudget::default());
    /// assert_eq!(candidate.basic_attempts(), 0);
    /// ```
    pub fn new(url: impl Into<String>, budget: AttemptBudget) -> Self {
        Self::discovered_at(url, budget, Utc::now())
    }

    /// Create a candidate with an explicit discovery time
    pub fn discovered_at(url: impl Into<String>, budget: AttemptBudget, at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            discovered_at: at,
            budget,
            basic_attempts: 0,
            detailed_attempts: 0,
            basic_status: StageStatus::Pending,
            detailed_status: StageStatus::Pending,
            retained_keywords: None,
        }
    }

    /// The candidate URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// When the frontier released this candidate
    pub fn discovered_at_time(&self) -> DateTime<Utc> {
        self.discovered_at
    }

    /// Attempt caps in force for this candidate
    pub fn budget(&self) -> AttemptBudget {
        self.budget
    }

    /// Basic extraction attempts started so far
    pub fn basic_attempts(&self) -> u32 {
        self.basic_attempts
    }

    /// Detailed extraction attempts started so far
    pub fn detailed_attempts(&self) -> u32 {
        self.detailed_attempts
    }

    /// Current status of a stage (`Pending` for fetch/persist, which are not tracked)
    pub fn status(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Basic => self.basic_status,
            Stage::Detailed => self.detailed_status,
            Stage::Fetch | Stage::Persist => StageStatus::Pending,
        }
    }

    /// Start a new attempt at an extraction stage
    ///
    /// Returns the 1-based attempt number, or `None` when the stage has
    /// already exited (success or failure) or its budget is spent. Counters
    /// never decrease and never exceed the stage cap.
    pub fn start_attempt(&mut self, stage: Stage) -> Option<u32> {
        let (attempts, cap, status) = match stage {
            Stage::Basic => (&mut self.basic_attempts, self.budget.basic, self.basic_status),
            Stage::Detailed => (&mut self.detailed_attempts, self.budget.detailed, self.detailed_status),
            Stage::Fetch | Stage::Persist => return None,
        };
        if status.is_terminal() || *attempts >= cap {
            return None;
        }
        *attempts += 1;
        Some(*attempts)
    }

    /// Whether another attempt at `stage` fits in the budget
    pub fn has_budget(&self, stage: Stage) -> bool {
        match stage {
            Stage::Basic => self.basic_attempts < self.budget.basic,
            Stage::Detailed => self.detailed_attempts < self.budget.detailed,
            Stage::Fetch | Stage::Persist => false,
        }
    }

    /// Record the status of an extraction stage after validation
    ///
    /// A stage that already exited keeps its status.
    pub fn set_status(&mut self, stage: Stage, status: StageStatus) {
        let slot = match stage {
            Stage::Basic => &mut self.basic_status,
            Stage::Detailed => &mut self.detailed_status,
            Stage::Fetch | Stage::Persist => return,
        };
        if !slot.is_terminal() {
            *slot = status;
        }
    }

    /// Keywords retained from the first parsed detailed attempt
    pub fn retained_keywords(&self) -> Option<&[String]> {
        self.retained_keywords.as_deref()
    }

    /// Retain the keyword list; later calls are ignored once a list is held
    ///
    /// Returns `true` when the list was stored by this call.
    pub fn retain_keywords(&mut self, keywords: Vec<String>) -> bool {
        if self.retained_keywords.is_some() {
            return false;
        }
        self.retained_keywords = Some(keywords);
        true
    }

    /// Both extraction stages succeeded, so the record may be written
    pub fn ready_to_persist(&self) -> bool {
        self.basic_status == StageStatus::Success && self.detailed_status == StageStatus::Success
    }
}
