//! Pipeline states and the transition table

use gleaner_domain::{Stage, StageStatus};
use std::fmt;

/// Where one candidate is in the acquisition pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Retrieving the page
    Fetching,
    /// Waiting on the basic oracle call
    ExtractingBasic,
    /// Judging the basic fields
    ValidatingBasic,
    /// Waiting on the detailed oracle call
    ExtractingDetailed,
    /// Judging the detailed fields
    ValidatingDetailed,
    /// Writing the record
    Persisting,
    /// Terminal: the repository was called
    Persisted,
    /// Terminal: dropped without a write
    Skipped,
}

impl PipelineState {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Persisted | PipelineState::Skipped)
    }

    /// The stage this state belongs to (`None` for terminal states)
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Fetching => Some(Stage::Fetch),
            PipelineState::ExtractingBasic | PipelineState::ValidatingBasic => Some(Stage::Basic),
            PipelineState::ExtractingDetailed | PipelineState::ValidatingDetailed => {
                Some(Stage::Detailed)
            }
            PipelineState::Persisting => Some(Stage::Persist),
            PipelineState::Persisted | PipelineState::Skipped => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Fetching => "fetching",
            PipelineState::ExtractingBasic => "extracting_basic",
            PipelineState::ValidatingBasic => "validating_basic",
            PipelineState::ExtractingDetailed => "extracting_detailed",
            PipelineState::ValidatingDetailed => "validating_detailed",
            PipelineState::Persisting => "persisting",
            PipelineState::Persisted => "persisted",
            PipelineState::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// Next state given the current one and the status its step produced
///
/// `Pending` never moves a candidate. Extraction always proceeds to
/// validation once the oracle call returns, whatever it returned; the
/// validator turns a parse failure into `Retry` or `Failed`. Fetch has no
/// retry. Persisting is terminal whatever the write result.
pub fn transition(state: PipelineState, status: StageStatus) -> PipelineState {
    use PipelineState::*;
    use StageStatus::*;

    match (state, status) {
        (_, Pending) => state,

        (Fetching, Success) => ExtractingBasic,
        (Fetching, Retry | Failed) => Skipped,

        (ExtractingBasic, Success | Retry | Failed) => ValidatingBasic,

        (ValidatingBasic, Success) => ExtractingDetailed,
        (ValidatingBasic, Retry) => ExtractingBasic,
        (ValidatingBasic, Failed) => Skipped,

        (ExtractingDetailed, Success | Retry | Failed) => ValidatingDetailed,

        (ValidatingDetailed, Success) => Persisting,
        (ValidatingDetailed, Retry) => ExtractingDetailed,
        (ValidatingDetailed, Failed) => Skipped,

        (Persisting, Success | Retry | Failed) => Persisted,

        (Persisted, _) => Persisted,
        (Skipped, _) => Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineState::*;

    const ALL_STATES: [PipelineState; 8] = [
        Fetching,
        ExtractingBasic,
        ValidatingBasic,
        ExtractingDetailed,
        ValidatingDetailed,
        Persisting,
        Persisted,
        Skipped,
    ];

    const ALL_STATUSES: [StageStatus; 4] = [
        StageStatus::Pending,
        StageStatus::Success,
        StageStatus::Retry,
        StageStatus::Failed,
    ];

    #[test]
    fn test_happy_path() {
        let mut state = Fetching;
        let mut visited = vec![state];
        while !state.is_terminal() {
            state = transition(state, StageStatus::Success);
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                Fetching,
                ExtractingBasic,
                ValidatingBasic,
                ExtractingDetailed,
                ValidatingDetailed,
                Persisting,
                Persisted
            ]
        );
    }

    #[test]
    fn test_fetch_failure_skips() {
        assert_eq!(transition(Fetching, StageStatus::Failed), Skipped);
        assert_eq!(transition(Fetching, StageStatus::Retry), Skipped);
    }

    #[test]
    fn test_validation_retries_loop_back() {
        assert_eq!(transition(ValidatingBasic, StageStatus::Retry), ExtractingBasic);
        assert_eq!(transition(ValidatingDetailed, StageStatus::Retry), ExtractingDetailed);
        assert_eq!(transition(ValidatingBasic, StageStatus::Failed), Skipped);
        assert_eq!(transition(ValidatingDetailed, StageStatus::Failed), Skipped);
    }

    #[test]
    fn test_extraction_always_reaches_validation() {
        for status in [StageStatus::Success, StageStatus::Retry, StageStatus::Failed] {
            assert_eq!(transition(ExtractingBasic, status), ValidatingBasic);
            assert_eq!(transition(ExtractingDetailed, status), ValidatingDetailed);
        }
    }

    #[test]
    fn test_persisting_is_always_terminal() {
        assert_eq!(transition(Persisting, StageStatus::Failed), Persisted);
    }

    #[test]
    fn test_terminal_states_absorb_and_pending_holds() {
        for state in ALL_STATES {
            assert_eq!(transition(state, StageStatus::Pending), state);
            if state.is_terminal() {
                for status in ALL_STATUSES {
                    assert_eq!(transition(state, status), state);
                }
            }
        }
    }

    #[test]
    fn test_never_moves_backwards_past_a_success() {
        // Once detailed extraction has been entered, basic states are unreachable.
        let detailed_side = [ExtractingDetailed, ValidatingDetailed, Persisting, Persisted, Skipped];
        for state in detailed_side {
            for status in ALL_STATUSES {
                let next = transition(state, status);
                assert_ne!(next, ExtractingBasic);
                assert_ne!(next, ValidatingBasic);
                assert_ne!(next, Fetching);
            }
        }
    }
}
