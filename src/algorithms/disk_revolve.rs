//! `DiskRevolve` (§4.3/§4.5): unbounded disk, RAM budget `snaps_in_ram`.

use crate::action::{Action, Step};
use crate::compiler::{compile_disk_revolve, translate};
use crate::cost::CostParams;
use crate::error::ScheduleResult;
use crate::schedule::{impl_schedule_iterator, Schedule};
use crate::table::DiskRevolveTable;

use super::revolve::{build_opt0, RevolveAdapter};

pub struct DiskRevolve {
    adapter: RevolveAdapter,
}

impl DiskRevolve {
    pub fn new(max_n: Step, snaps_in_ram: Step) -> ScheduleResult<Self> {
        Self::with_cost_params(max_n, snaps_in_ram, CostParams::default())
    }

    pub fn with_cost_params(max_n: Step, snaps_in_ram: Step, params: CostParams) -> ScheduleResult<Self> {
        let opt0 = build_opt0(max_n, snaps_in_ram, params)?;
        let disk_table = DiskRevolveTable::build(max_n as usize, snaps_in_ram as usize, params, &opt0);
        let ops = compile_disk_revolve(&disk_table, &opt0, max_n as usize, 0);
        let actions = translate(&ops, max_n);
        let uses_disk = !disk_table.is_ram_only(max_n as usize);
        Ok(DiskRevolve {
            adapter: RevolveAdapter::new(actions, max_n, uses_disk),
        })
    }
}

impl Schedule for DiskRevolve {
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

impl_schedule_iterator!(DiskRevolve);
