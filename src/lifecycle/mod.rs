//! Project lifecycle state machine.
//!
//! A project moves along a fixed graph:
//!
//! ```text
//! Open -> InProgress -> Completed
//!                    -> Rejected
//! ```
//!
//! `Completed` and `Rejected` are terminal. Every other edge is illegal and
//! is rejected by [`ProjectStatus::transition`] with a typed error, so status
//! changes can only happen through the named operations (assign, complete,
//! reject).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of a project, stored as lowercase text in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    InProgress,
    Completed,
    Rejected,
}

/// Error returned for an edge that is not in the transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move a {from} project to {to}")]
pub struct TransitionError {
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Rejected => "rejected",
        }
    }

    /// Whether no further transitions are possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Rejected)
    }

    /// Validate a status change, returning the new status if the edge is legal.
    pub fn transition(self, to: ProjectStatus) -> Result<ProjectStatus, TransitionError> {
        use ProjectStatus::*;

        match (self, to) {
            (Open, InProgress) | (InProgress, Completed) | (InProgress, Rejected) => Ok(to),
            (from, to) => Err(TransitionError { from, to }),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProjectStatus::*;

    const ALL: [ProjectStatus; 4] = [Open, InProgress, Completed, Rejected];

    #[test]
    fn test_legal_transitions() {
        assert_eq!(Open.transition(InProgress), Ok(InProgress));
        assert_eq!(InProgress.transition(Completed), Ok(Completed));
        assert_eq!(InProgress.transition(Rejected), Ok(Rejected));
    }

    #[test]
    fn test_every_other_edge_is_illegal() {
        let legal = [(Open, InProgress), (InProgress, Completed), (InProgress, Rejected)];

        for from in ALL {
            for to in ALL {
                if legal.contains(&(from, to)) {
                    continue;
                }
                assert_eq!(from.transition(to), Err(TransitionError { from, to }));
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for to in ALL {
            assert!(Completed.transition(to).is_err());
            assert!(Rejected.transition(to).is_err());
        }
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Open.is_terminal());
        assert!(!InProgress.is_terminal());
    }

    #[test]
    fn test_status_text_round_trip() {
        assert_eq!(Open.as_str(), "open");
        assert_eq!(InProgress.as_str(), "in_progress");
        assert_eq!(
            serde_json::from_str::<ProjectStatus>("\"in_progress\"").unwrap(),
            InProgress
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = Completed.transition(Open).unwrap_err();
        assert_eq!(err.to_string(), "cannot move a completed project to open");
    }
}
