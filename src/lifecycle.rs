use crate::error::{Error, Result};
use crate::models::AlertStatus;

impl AlertStatus {
    /// The unique legal next state, if any. RESOLVED is terminal.
    pub fn successor(self) -> Option<AlertStatus> {
        match self {
            AlertStatus::Open => Some(AlertStatus::Ack),
            AlertStatus::Ack => Some(AlertStatus::Resolved),
            AlertStatus::Resolved => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

/// Guard for the OPEN -> ACK -> RESOLVED lifecycle. Anything other than the
/// single-step forward transition is a caller bug and fails loudly; the
/// original UI only prevented this through conditional rendering.
pub fn ensure_transition(current: AlertStatus, target: AlertStatus) -> Result<()> {
    if current.successor() == Some(target) {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successor_chain_is_open_ack_resolved() {
        assert_eq!(AlertStatus::Open.successor(), Some(AlertStatus::Ack));
        assert_eq!(AlertStatus::Ack.successor(), Some(AlertStatus::Resolved));
        assert_eq!(AlertStatus::Resolved.successor(), None);
        assert!(AlertStatus::Resolved.is_terminal());
        assert!(!AlertStatus::Open.is_terminal());
    }

    #[test]
    fn only_forward_single_steps_are_legal() {
        let all = [AlertStatus::Open, AlertStatus::Ack, AlertStatus::Resolved];
        for current in all {
            for target in all {
                let legal = matches!(
                    (current, target),
                    (AlertStatus::Open, AlertStatus::Ack)
                        | (AlertStatus::Ack, AlertStatus::Resolved)
                );
                let result = ensure_transition(current, target);
                if legal {
                    assert!(result.is_ok(), "{current} -> {target} should be legal");
                } else {
                    assert!(
                        matches!(
                            result,
                            Err(Error::InvalidTransition { from, to })
                                if from == current && to == target
                        ),
                        "{current} -> {target} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn skipping_ack_is_rejected() {
        let err = ensure_transition(AlertStatus::Open, AlertStatus::Resolved)
            .expect_err("OPEN -> RESOLVED must not be allowed");
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }
}
