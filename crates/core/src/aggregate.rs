//! Process-wide pass/fail accumulator.

use crate::outcome::RunOutcome;

/// "Any failure occurred" flag for the whole run.
///
/// Starts clean and only ever moves from success to failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateResult {
    failed: bool,
}

impl AggregateResult {
    /// A fresh, successful result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a failure flag in.
    pub fn fold(&mut self, failed: bool) {
        self.failed |= failed;
    }

    /// Fold a finished job in.
    pub fn fold_outcome(&mut self, outcome: &RunOutcome) {
        self.fold(!outcome.success());
    }

    /// Whether anything failed.
    pub fn is_failure(&self) -> bool {
        self.failed
    }

    /// Process exit code: 0 on full success, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.failed)
    }
}
