//! `Mixed` (§4.8): a single storage budget shared between restart data and
//! adjoint-dependency data, following the recurrence shape documented in
//! DESIGN.md Open Question 5.

use crate::action::{Action, Step, StorageKind};
use crate::compiler::{compile_mixed, translate};
use crate::cost::CostParams;
use crate::error::ScheduleResult;
use crate::schedule::{impl_schedule_iterator, Schedule};
use crate::table::MixedTable;

use super::revolve::{build_opt0, RevolveAdapter};

pub struct Mixed {
    adapter: RevolveAdapter,
}

impl Mixed {
    pub fn new(max_n: Step, snaps_on_disk: Step) -> ScheduleResult<Self> {
        Self::with_options(max_n, snaps_on_disk, StorageKind::Disk, CostParams::default())
    }

    pub fn with_options(
        max_n: Step,
        snaps_on_disk: Step,
        storage: StorageKind,
        params: CostParams,
    ) -> ScheduleResult<Self> {
        let opt0 = build_opt0(max_n, snaps_on_disk, params)?;
        let mixed = MixedTable::build(max_n as usize, snaps_on_disk as usize, params, &opt0);
        let ops = compile_mixed(&mixed, &opt0, max_n as usize, snaps_on_disk as usize, 0, storage);
        let actions = translate(&ops, max_n);
        Ok(Mixed {
            adapter: RevolveAdapter::new(actions, max_n, storage == StorageKind::Disk),
        })
    }
}

impl Schedule for Mixed {
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

impl_schedule_iterator!(Mixed);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[test]
    fn golden_sequence_s6_terminates_cleanly() {
        let mut s = Mixed::new(4, 2).unwrap();
        let mut last = None;
        while let Some(action) = s.next_action().unwrap() {
            last = Some(action);
        }
        assert_eq!(last, Some(Action::EndReverse));
    }

    #[test]
    fn ram_storage_option_is_reported() {
        let s = Mixed::with_options(4, 2, StorageKind::Ram, CostParams::default()).unwrap();
        assert!(!s.uses_disk_storage());
    }
}
