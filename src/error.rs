use thiserror::Error;

use crate::types::BoundaryLevel;

/// Rejected selection mutations. Never reaches the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("cannot select a {level} while no {parent} is selected")]
    ParentUnset { level: BoundaryLevel, parent: BoundaryLevel },
}

/// Recoverable conditions of the selection/boundary subsystem.
/// None of them end the session; the selection stays valid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    /// The boundary service failed; the previous layer is kept.
    #[error("could not load {level} boundaries for {}: {reason}", describe(parents))]
    TransientFetch { level: BoundaryLevel, parents: Vec<String>, reason: String },

    /// The fetch succeeded with zero features.
    #[error("no {level} boundaries for {}", describe(parents))]
    EmptyResult { level: BoundaryLevel, parents: Vec<String> },

    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),

    /// A click that did not resolve to a selectable region. Logged only.
    #[error("click on {} matched no selectable {level}", name.as_deref().unwrap_or("<unnamed>"))]
    UnresolvedClick { level: BoundaryLevel, name: Option<String> },
}

impl SyncError {
    /// Whether this error is shown to the user (as opposed to only logged).
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, SyncError::UnresolvedClick { .. })
    }
}

fn describe(parents: &[String]) -> String {
    if parents.is_empty() { "the whole country".to_string() } else { parents.join(" / ") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_selection() {
        let err = SyncError::TransientFetch {
            level: BoundaryLevel::District,
            parents: vec!["Punjab".into()],
            reason: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "could not load district boundaries for Punjab: connection refused");

        let empty = SyncError::EmptyResult { level: BoundaryLevel::State, parents: vec![] };
        assert_eq!(empty.to_string(), "no state boundaries for the whole country");

        let invalid: SyncError = SelectionError::ParentUnset {
            level: BoundaryLevel::District,
            parent: BoundaryLevel::State,
        }.into();
        assert_eq!(invalid.to_string(), "cannot select a district while no state is selected");
        assert!(invalid.is_surfaced());
        assert!(!SyncError::UnresolvedClick { level: BoundaryLevel::State, name: None }.is_surfaced());
    }
}
