//! `PeriodicDiskRevolve` (§4.3): chooses a single optimal period `p*`
//! directly from the closed-form cost formula, rather than a per-length
//! backtrack table.

use crate::action::{Action, Step};
use crate::compiler::{compile_periodic_disk_revolve, translate};
use crate::cost::CostParams;
use crate::error::ScheduleResult;
use crate::schedule::{impl_schedule_iterator, Schedule};
use crate::table::periodic_disk_revolve_choice;

use super::revolve::{build_opt0, RevolveAdapter};

pub struct PeriodicDiskRevolve {
    adapter: RevolveAdapter,
    period: u32,
}

impl PeriodicDiskRevolve {
    pub fn new(max_n: Step, snaps_in_ram: Step) -> ScheduleResult<Self> {
        Self::with_cost_params(max_n, snaps_in_ram, CostParams::default())
    }

    pub fn with_cost_params(max_n: Step, snaps_in_ram: Step, params: CostParams) -> ScheduleResult<Self> {
        let opt0 = build_opt0(max_n, snaps_in_ram, params)?;
        let choice = periodic_disk_revolve_choice(max_n as usize, snaps_in_ram as usize, params, &opt0);
        let ops = compile_periodic_disk_revolve(
            &opt0,
            max_n as usize,
            snaps_in_ram as usize,
            choice.period as usize,
            0,
        );
        let actions = translate(&ops, max_n);
        Ok(PeriodicDiskRevolve {
            adapter: RevolveAdapter::new(actions, max_n, true),
            period: choice.period,
        })
    }

    /// The chosen period `p*`, exposed for diagnostics/tests.
    pub fn period(&self) -> u32 {
        self.period
    }
}

impl Schedule for PeriodicDiskRevolve {
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

impl_schedule_iterator!(PeriodicDiskRevolve);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[test]
    fn picks_a_period_within_range() {
        let s = PeriodicDiskRevolve::new(12, 2).unwrap();
        assert!(s.period() >= 1 && s.period() <= 12);
    }

    #[test]
    fn action_stream_is_well_terminated() {
        let mut s = PeriodicDiskRevolve::new(9, 2).unwrap();
        let mut last = None;
        while let Some(action) = s.next_action().unwrap() {
            last = Some(action);
        }
        assert_eq!(last, Some(Action::EndReverse));
    }
}
