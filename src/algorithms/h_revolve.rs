//! `HRevolve` (§4.3): bounded disk (`snaps_on_disk` writes) and bounded RAM
//! (`snaps_in_ram`), generalizing `DiskRevolve`.

use crate::action::{Action, Step};
use crate::compiler::{compile_h_revolve, translate};
use crate::cost::CostParams;
use crate::error::ScheduleResult;
use crate::schedule::{impl_schedule_iterator, Schedule};
use crate::table::HRevolveTable;

use super::revolve::{build_opt0, RevolveAdapter};

pub struct HRevolve {
    adapter: RevolveAdapter,
}

impl HRevolve {
    pub fn new(max_n: Step, snaps_in_ram: Step, snaps_on_disk: Step) -> ScheduleResult<Self> {
        Self::with_cost_params(max_n, snaps_in_ram, snaps_on_disk, CostParams::default())
    }

    pub fn with_cost_params(
        max_n: Step,
        snaps_in_ram: Step,
        snaps_on_disk: Step,
        params: CostParams,
    ) -> ScheduleResult<Self> {
        let opt0 = build_opt0(max_n, snaps_in_ram, params)?;
        let h_table = HRevolveTable::build(
            max_n as usize,
            snaps_in_ram as usize,
            snaps_on_disk as usize,
            params,
            &opt0,
        );
        let ops = compile_h_revolve(&h_table, &opt0, max_n as usize, snaps_on_disk as usize, 0);
        let actions = translate(&ops, max_n);
        let uses_disk = snaps_on_disk > 0 && !h_table.is_ram_only(max_n as usize, snaps_on_disk as usize);
        Ok(HRevolve {
            adapter: RevolveAdapter::new(actions, max_n, uses_disk),
        })
    }
}

impl Schedule for HRevolve {
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

impl_schedule_iterator!(HRevolve);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[test]
    fn falls_back_to_ram_only_with_no_disk_budget() {
        let s = HRevolve::new(6, 4, 0).unwrap();
        assert!(!s.uses_disk_storage());
    }

    #[test]
    fn action_stream_is_well_terminated() {
        let mut s = HRevolve::new(10, 2, 2).unwrap();
        let mut last = None;
        while let Some(action) = s.next_action().unwrap() {
            last = Some(action);
        }
        assert_eq!(last, Some(Action::EndReverse));
    }
}
