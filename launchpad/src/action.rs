//! Per-action state machine for approve-then-act flows.
//!
//! An approval that confirmed before the action failed is not rolled back;
//! [`ActionTracker::fail`] records which state the failure happened in so the
//! leftover allowance is visible in logs and traces.

use std::fmt;

use alloy::primitives::TxHash;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Launch,
    Buy,
    Sell,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Launch => f.write_str("launch"),
            ActionKind::Buy => f.write_str("buy"),
            ActionKind::Sell => f.write_str("sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ActionState {
    Draft,
    MetadataBuilt,
    IntentsPrepared,
    DryRunComplete,
    ApprovalSubmitted { hash: TxHash },
    ApprovalConfirmed { hash: TxHash },
    ActionSubmitted { hash: TxHash },
    ActionConfirmed { hash: TxHash },
    Failed { reason: String },
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionState::DryRunComplete | ActionState::ActionConfirmed { .. } | ActionState::Failed { .. }
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: &ActionState) -> bool {
        use ActionState::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (_, Failed { .. })
                | (Draft, MetadataBuilt)
                | (Draft, IntentsPrepared)
                | (MetadataBuilt, IntentsPrepared)
                | (IntentsPrepared, DryRunComplete)
                | (IntentsPrepared, ApprovalSubmitted { .. })
                | (ApprovalSubmitted { .. }, ApprovalConfirmed { .. })
                | (ApprovalConfirmed { .. }, ActionSubmitted { .. })
                | (ActionSubmitted { .. }, ActionConfirmed { .. })
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal {kind} transition from {from:?} to {to:?}")]
pub struct IllegalTransition {
    pub kind: ActionKind,
    pub from: ActionState,
    pub to: ActionState,
}

/// Records the states one write action passes through.
#[derive(Debug, Clone)]
pub struct ActionTracker {
    kind: ActionKind,
    trace: Vec<ActionState>,
}

impl ActionTracker {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            trace: vec![ActionState::Draft],
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn current(&self) -> &ActionState {
        // The trace always starts with Draft.
        &self.trace[self.trace.len() - 1]
    }

    pub fn trace(&self) -> &[ActionState] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<ActionState> {
        self.trace
    }

    pub fn advance(&mut self, next: ActionState) -> Result<(), IllegalTransition> {
        if !self.current().can_transition_to(&next) {
            return Err(IllegalTransition {
                kind: self.kind,
                from: self.current().clone(),
                to: next,
            });
        }
        info!(action = %self.kind, "{:?} -> {:?}", self.current(), next);
        self.trace.push(next);
        Ok(())
    }

    /// Moves to `Failed`. Ignored once the action already reached a terminal state.
    pub fn fail(&mut self, reason: impl fmt::Display) {
        if self.current().is_terminal() {
            return;
        }
        let reason = reason.to_string();
        match self.current() {
            ActionState::ApprovalConfirmed { .. } | ActionState::ActionSubmitted { .. } => {
                warn!(
                    action = %self.kind,
                    approval = ?self.approval_hash(),
                    "action failed after approval confirmed; allowance stays on chain: {}",
                    reason
                );
            }
            state => warn!(action = %self.kind, "action failed in {:?}: {}", state, reason),
        }
        self.trace.push(ActionState::Failed { reason });
    }

    /// Whether any transaction of this action reached the network.
    pub fn has_broadcast(&self) -> bool {
        self.trace
            .iter()
            .any(|s| matches!(s, ActionState::ApprovalSubmitted { .. }))
    }

    pub fn approval_hash(&self) -> Option<TxHash> {
        self.trace.iter().find_map(|s| match s {
            ActionState::ApprovalConfirmed { hash } => Some(*hash),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u8) -> TxHash {
        TxHash::repeat_byte(n)
    }

    #[test]
    fn test_full_launch_path() {
        let mut tracker = ActionTracker::new(ActionKind::Launch);
        assert!(tracker.advance(ActionState::MetadataBuilt).is_ok());
        assert!(tracker.advance(ActionState::IntentsPrepared).is_ok());
        assert!(tracker.advance(ActionState::ApprovalSubmitted { hash: hash(1) }).is_ok());
        assert!(tracker.advance(ActionState::ApprovalConfirmed { hash: hash(1) }).is_ok());
        assert!(tracker.advance(ActionState::ActionSubmitted { hash: hash(2) }).is_ok());
        assert!(tracker.advance(ActionState::ActionConfirmed { hash: hash(2) }).is_ok());
        assert!(tracker.current().is_terminal());
        assert_eq!(tracker.trace().len(), 7);
        assert_eq!(tracker.approval_hash(), Some(hash(1)));
    }

    #[test]
    fn test_dry_run_path() {
        let mut tracker = ActionTracker::new(ActionKind::Launch);
        tracker.advance(ActionState::MetadataBuilt).unwrap();
        tracker.advance(ActionState::IntentsPrepared).unwrap();
        tracker.advance(ActionState::DryRunComplete).unwrap();
        assert!(tracker
            .advance(ActionState::ApprovalSubmitted { hash: hash(1) })
            .is_err());
    }

    #[test]
    fn test_cannot_act_before_approval_confirms() {
        let mut tracker = ActionTracker::new(ActionKind::Buy);
        tracker.advance(ActionState::IntentsPrepared).unwrap();
        tracker.advance(ActionState::ApprovalSubmitted { hash: hash(1) }).unwrap();
        let err = tracker
            .advance(ActionState::ActionSubmitted { hash: hash(2) })
            .unwrap_err();
        assert_eq!(err.kind, ActionKind::Buy);
        assert_eq!(err.from, ActionState::ApprovalSubmitted { hash: hash(1) });
    }

    #[test]
    fn test_failed_reachable_from_every_non_terminal_state() {
        let states = [
            ActionState::Draft,
            ActionState::MetadataBuilt,
            ActionState::IntentsPrepared,
            ActionState::ApprovalSubmitted { hash: hash(1) },
            ActionState::ApprovalConfirmed { hash: hash(1) },
            ActionState::ActionSubmitted { hash: hash(2) },
        ];
        let failed = ActionState::Failed { reason: "boom".to_string() };
        for state in states {
            assert!(state.can_transition_to(&failed), "{state:?}");
        }
        assert!(!ActionState::DryRunComplete.can_transition_to(&failed));
        assert!(!failed.can_transition_to(&ActionState::Draft));
    }

    #[test]
    fn test_fail_after_approval_keeps_trace() {
        let mut tracker = ActionTracker::new(ActionKind::Sell);
        tracker.advance(ActionState::IntentsPrepared).unwrap();
        tracker.advance(ActionState::ApprovalSubmitted { hash: hash(3) }).unwrap();
        tracker.advance(ActionState::ApprovalConfirmed { hash: hash(3) }).unwrap();
        tracker.fail("sell intent rejected");
        assert_eq!(
            tracker.current(),
            &ActionState::Failed { reason: "sell intent rejected".to_string() }
        );
        assert_eq!(tracker.approval_hash(), Some(hash(3)));

        tracker.fail("again");
        assert_eq!(tracker.trace().len(), 5);
    }

    #[test]
    fn test_fail_while_action_pending() {
        let mut tracker = ActionTracker::new(ActionKind::Buy);
        tracker.advance(ActionState::IntentsPrepared).unwrap();
        assert!(!tracker.has_broadcast());
        tracker.advance(ActionState::ApprovalSubmitted { hash: hash(1) }).unwrap();
        tracker.advance(ActionState::ApprovalConfirmed { hash: hash(1) }).unwrap();
        tracker.advance(ActionState::ActionSubmitted { hash: hash(2) }).unwrap();
        tracker.fail("buy reverted");

        assert!(tracker.has_broadcast());
        assert_eq!(tracker.approval_hash(), Some(hash(1)));
        assert_eq!(
            &tracker.trace()[4..],
            &[
                ActionState::ActionSubmitted { hash: hash(2) },
                ActionState::Failed { reason: "buy reverted".to_string() },
            ]
        );
    }
}
