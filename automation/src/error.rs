//! Error types shared across the automation subsystem.
//!
//! Collaborator-specific errors live next to their service; this module
//! defines the error surface of an action dispatch, which the executor
//! records as a per-action failure without aborting sibling actions.

use crate::services::email::EmailError;
use crate::services::tasks::{NotifyError, TaskError};
use crate::services::whatsapp::MessageError;

/// Error raised by a single action handler.
///
/// Every variant is recoverable: the executor logs it, records a failed
/// outcome for the action, and moves on to the next action in the list.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The action's configuration payload was missing a required value or
    /// could not be interpreted by the handler.
    #[error("invalid action configuration: {0}")]
    BadConfig(String),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Messaging(#[from] MessageError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_config_message() {
        let err = ActionError::BadConfig("no resolvable recipient".to_string());
        assert_eq!(
            err.to_string(),
            "invalid action configuration: no resolvable recipient"
        );
    }
}
