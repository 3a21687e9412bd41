use super::delivery::DeliveryFailure;
use std::fmt;

/// Result of a style update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The server confirmed the update.
    Delivered,
    /// An identical update was confirmed earlier; nothing was sent.
    AlreadyApplied,
    /// The update carried no fields; nothing was sent.
    Empty,
    /// The update was sent but not confirmed.
    Failed(DeliveryFailure),
}

impl UpdateOutcome {
    /// Whether the server's state now reflects the update.
    ///
    /// `Empty` reports `false`: there was nothing to apply.
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Delivered | UpdateOutcome::AlreadyApplied)
    }

    pub fn failure(&self) -> Option<&DeliveryFailure> {
        match self {
            UpdateOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<Result<(), DeliveryFailure>> for UpdateOutcome {
    fn from(result: Result<(), DeliveryFailure>) -> Self {
        match result {
            Ok(()) => UpdateOutcome::Delivered,
            Err(failure) => UpdateOutcome::Failed(failure),
        }
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::Delivered => f.write_str("applied"),
            UpdateOutcome::AlreadyApplied => f.write_str("already applied"),
            UpdateOutcome::Empty => f.write_str("nothing to update"),
            UpdateOutcome::Failed(failure) => write!(f, "failed: {failure}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_applied() {
        assert!(UpdateOutcome::Delivered.is_applied());
        assert!(UpdateOutcome::AlreadyApplied.is_applied());
        assert!(!UpdateOutcome::Empty.is_applied());
        assert!(!UpdateOutcome::Failed(DeliveryFailure::ClientStatus(400)).is_applied());
    }

    #[test]
    fn test_from_delivery_result() {
        assert_eq!(UpdateOutcome::from(Ok(())), UpdateOutcome::Delivered);
        let outcome = UpdateOutcome::from(Err(DeliveryFailure::ClientStatus(404)));
        assert_eq!(outcome.failure(), Some(&DeliveryFailure::ClientStatus(404)));
        assert_eq!(outcome.to_string(), "failed: HTTP 404");
    }
}
