//! The confirmation gate between planning and execution

use super::SyncPlan;
use crate::Result;

/// Decides whether a planned run may proceed.
///
/// Returning `Ok(false)` aborts the run without touching either tree.
pub trait Confirm {
    fn confirm(&mut self, plan: &SyncPlan) -> Result<bool>;
}

/// Accepts every plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _plan: &SyncPlan) -> Result<bool> {
        Ok(true)
    }
}

/// Gives the same answer every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _plan: &SyncPlan) -> Result<bool> {
        Ok(self.0)
    }
}
