//! `Revolve`, the classical single-level checkpointing schedule, and the
//! shared `RevolveAdapter` the whole Revolve family wraps. Dispatch style
//! mirrors the existing crate's `DeciderStandard`, which routes to shared
//! machinery via small per-variant structs.

use tracing::{debug, trace};

use crate::action::{Action, Step, StorageKind};
use crate::compiler::{compile_opt0, translate};
use crate::cost::{CostParams, INF};
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{impl_schedule_iterator, Schedule};
use crate::table::Opt0Table;

/// Shared driver for every Revolve-family schedule: the planner (table +
/// compiler) runs once at construction, per §5 ("the planners perform pure
/// computation up front; the adapter is a state machine advanced on each
/// `next_action()`"); this adapter then just walks the materialized action
/// list.
pub(crate) struct RevolveAdapter {
    actions: Vec<Action>,
    idx: usize,
    max_n: Step,
    uses_disk: bool,
}

impl RevolveAdapter {
    pub(crate) fn new(actions: Vec<Action>, max_n: Step, uses_disk: bool) -> Self {
        RevolveAdapter {
            actions,
            idx: 0,
            max_n,
            uses_disk,
        }
    }
}

impl Schedule for RevolveAdapter {
    fn next_action(&mut self) -> ScheduleResult<Option<Action>> {
        if self.idx >= self.actions.len() {
            return Err(ScheduleError::IterationAfterExhausted);
        }
        let action = self.actions[self.idx];
        trace!(idx = self.idx, %action, "emitting action");
        self.idx += 1;
        if self.idx >= self.actions.len() {
            debug!("schedule exhausted");
        }
        Ok(Some(action))
    }

    fn max_n(&self) -> Option<Step> {
        Some(self.max_n)
    }

    fn uses_disk_storage(&self) -> bool {
        self.uses_disk
    }

    fn is_exhausted(&self) -> bool {
        self.idx >= self.actions.len()
    }

    fn finalize(&mut self, n1: Step) -> ScheduleResult<()> {
        if n1 == self.max_n {
            debug!(n1, "finalize (no-op: max_n already fixed at construction)");
            Ok(())
        } else {
            Err(ScheduleError::FinalizeConflict {
                requested: n1,
                current: Some(self.max_n),
            })
        }
    }
}

/// Validates `max_n` and budget, then builds an `Opt0Table` for `l = max_n`.
/// Shared by `Revolve` and by the other RAM-budget checks in this family.
pub(crate) fn build_opt0(max_n: Step, snaps_in_ram: Step, params: CostParams) -> ScheduleResult<Opt0Table> {
    if max_n == 0 {
        return Err(ScheduleError::InvalidSteps { max_n: 0 });
    }
    let table = Opt0Table::build(max_n as usize, snaps_in_ram as usize, params);
    if table.cost(max_n as usize, snaps_in_ram as usize) >= INF {
        return Err(ScheduleError::InvalidBudget {
            required: 1,
            snaps_in_ram,
            snaps_on_disk: 0,
        });
    }
    Ok(table)
}

/// The classical single-level Revolve schedule (Griewank & Walther's
/// `Opt_0`): bounded RAM, unbounded recomputation.
pub struct Revolve {
    adapter: RevolveAdapter,
}

impl Revolve {
    pub fn new(max_n: Step, snaps_in_ram: Step) -> ScheduleResult<Self> {
        Self::with_cost_params(max_n, snaps_in_ram, CostParams::default())
    }

    pub fn with_cost_params(max_n: Step, snaps_in_ram: Step, params: CostParams) -> ScheduleResult<Self> {
        let table = build_opt0(max_n, snaps_in_ram, params)?;
        let ops = compile_opt0(&table, max_n as usize, snaps_in_ram as usize, 0, StorageKind::Ram);
        let actions = translate(&ops, max_n);
        Ok(Revolve {
            adapter: RevolveAdapter::new(actions, max_n, false),
        })
    }
}

impl Schedule for Revolve {
    fn next_action(&mut self) -> ScheduleResult<Option<Action>> {
        self.adapter.next_action()
    }

    fn max_n(&self) -> Option<Step> {
        self.adapter.max_n()
    }

    fn uses_disk_storage(&self) -> bool {
        self.adapter.uses_disk_storage()
    }

    fn is_exhausted(&self) -> bool {
        self.adapter.is_exhausted()
    }

    fn finalize(&mut self, n1: Step) -> ScheduleResult<()> {
        self.adapter.finalize(n1)
    }
}

impl_schedule_iterator!(Revolve);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_steps() {
        assert!(matches!(
            Revolve::new(0, 2),
            Err(ScheduleError::InvalidSteps { max_n: 0 })
        ));
    }

    #[test]
    fn rejects_budget_too_small_for_long_trajectories() {
        assert!(matches!(
            Revolve::new(5, 0),
            Err(ScheduleError::InvalidBudget { .. })
        ));
    }

    #[test]
    fn action_stream_starts_and_ends_correctly() {
        let mut s = Revolve::new(4, 2).unwrap();
        let first = s.next_action().unwrap().unwrap();
        assert!(matches!(first, Action::Forward { n0: 0, .. }));
        let mut last = None;
        while let Some(action) = s.next_action().unwrap() {
            last = Some(action);
        }
        assert_eq!(last, Some(Action::EndReverse));
        assert!(s.is_exhausted());
    }

    #[test]
    fn deterministic_across_independent_constructions() {
        let mut a = Revolve::new(6, 2).unwrap();
        let mut b = Revolve::new(6, 2).unwrap();
        loop {
            let x = a.next_action().unwrap();
            let y = b.next_action().unwrap();
            assert_eq!(x, y);
            if x.is_none() {
                break;
            }
        }
    }

    #[test]
    fn never_exceeds_ram_budget_checkpoints_live_at_once() {
        // Property P3 (budget): count concurrently-live RAM writes never
        // exceeds snaps_in_ram.
        let snaps_in_ram = 2u64;
        let mut s = Revolve::new(5, snaps_in_ram).unwrap();
        let mut live: u64 = 0;
        let mut max_live: u64 = 0;
        while let Some(action) = s.next_action().unwrap() {
            match action {
                Action::Forward { write_ics: true, storage: StorageKind::Ram, .. } => {
                    live += 1;
                    max_live = max_live.max(live);
                }
                Action::Move { from_storage: StorageKind::Ram, .. } => {
                    live = live.saturating_sub(1);
                }
                _ => {}
            }
        }
        assert!(max_live <= snaps_in_ram);
    }
}
