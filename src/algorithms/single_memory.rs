//! `SingleMemoryStorage` (§4.2): store every step's adjoint-dependency data
//! in one storage level, then run the adjoint in a single uninterrupted
//! sweep. No recomputation, trivial correctness; a baseline.

use tracing::debug;

use crate::action::{Action, Step, StorageKind, INT_MAX};
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{impl_schedule_iterator, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    AwaitingFinalize,
    AwaitingReverse,
    AwaitingEndReverse,
    Exhausted,
}

/// Builder for [`SingleMemoryStorage`]. See DESIGN.md Open Question 2: the
/// base behavior (`write_ics=false`) is always available via
/// [`SingleMemoryStorage::new`]; this builder is the opt-in enhancement.
#[derive(Debug, Clone, Copy)]
pub struct SingleMemoryStorageBuilder {
    write_ics: bool,
    storage_ics: StorageKind,
}

impl SingleMemoryStorageBuilder {
    pub fn write_ics(mut self, write_ics: bool) -> Self {
        self.write_ics = write_ics;
        self
    }

    pub fn storage_ics(mut self, storage_ics: StorageKind) -> Self {
        self.storage_ics = storage_ics;
        self
    }

    pub fn build(self) -> SingleMemoryStorage {
        SingleMemoryStorage {
            state: State::NotStarted,
            max_n: None,
            write_ics: self.write_ics,
            storage_ics: self.storage_ics,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SingleMemoryStorage {
    state: State,
    max_n: Option<Step>,
    write_ics: bool,
    storage_ics: StorageKind,
}

impl SingleMemoryStorage {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SingleMemoryStorageBuilder {
        SingleMemoryStorageBuilder {
            write_ics: false,
            storage_ics: StorageKind::Ram,
        }
    }
}

impl Default for SingleMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for SingleMemoryStorage {
    fn next_action(&mut self) -> ScheduleResult<Option<Action>> {
        match self.state {
            State::NotStarted => {
                self.state = State::AwaitingFinalize;
                Ok(Some(Action::Forward {
                    n0: 0,
                    n1: INT_MAX,
                    write_ics: self.write_ics,
                    write_adj_deps: true,
                    storage: self.storage_ics,
                }))
            }
            State::AwaitingFinalize => {
                if self.max_n.is_none() {
                    return Err(ScheduleError::InternalInvariant(
                        "next_action called before finalize fixed max_n".into(),
                    ));
                }
                self.state = State::AwaitingReverse;
                Ok(Some(Action::EndForward))
            }
            State::AwaitingReverse => {
                let max_n = self.max_n.expect("checked above");
                self.state = State::AwaitingEndReverse;
                Ok(Some(Action::Reverse {
                    n1: max_n,
                    n0: 0,
                    clear_adj_deps: true,
                }))
            }
            State::AwaitingEndReverse => {
                self.state = State::Exhausted;
                debug!("schedule exhausted");
                Ok(Some(Action::EndReverse))
            }
            State::Exhausted => Err(ScheduleError::IterationAfterExhausted),
        }
    }

    fn max_n(&self) -> Option<Step> {
        self.max_n
    }

    fn uses_disk_storage(&self) -> bool {
        self.storage_ics == StorageKind::Disk
    }

    fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    fn finalize(&mut self, n1: Step) -> ScheduleResult<()> {
        match self.max_n {
            Some(current) if current != n1 => Err(ScheduleError::FinalizeConflict {
                requested: n1,
                current: Some(current),
            }),
            _ => {
                debug!(n1, "finalize");
                self.max_n = Some(n1);
                Ok(())
            }
        }
    }
}

impl_schedule_iterator!(SingleMemoryStorage);
