//! Error types for alert handling.

use thiserror::Error;

use super::types::AlertStatus;

/// Error type for alert operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// An SOS was raised without describing the situation.
    #[error("Emergency message is required")]
    EmptyMessage,

    /// The alert cannot move between these states.
    #[error("Cannot move alert from {} to {}", from.as_str(), to.as_str())]
    InvalidTransition {
        /// Current status.
        from: AlertStatus,
        /// Requested status.
        to: AlertStatus,
    },
}

/// Result type alias for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_display() {
        assert_eq!(
            AlertError::EmptyMessage.to_string(),
            "Emergency message is required"
        );
    }

    #[test]
    fn invalid_transition_display() {
        let err = AlertError::InvalidTransition {
            from: AlertStatus::Resolved,
            to: AlertStatus::Acknowledged,
        };
        assert_eq!(
            err.to_string(),
            "Cannot move alert from resolved to acknowledged"
        );
    }
}
