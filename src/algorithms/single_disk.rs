//! `SingleDiskStorage` (§4.2): store every step's adjoint-dependency data on
//! disk, then run the adjoint one step at a time, retrieving each step's
//! data immediately before its `Reverse`. A baseline; `move_data` controls
//! whether retrieval frees the disk slot.

use tracing::{debug, trace};

use crate::action::{Action, Step, StorageKind, INT_MAX};
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{impl_schedule_iterator, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    AwaitingFinalize,
    AwaitingRetrieve(Step),
    AwaitingReverse(Step),
    AwaitingEndReverse,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct SingleDiskStorage {
    state: State,
    max_n: Option<Step>,
    move_data: bool,
}

impl SingleDiskStorage {
    pub fn new() -> Self {
        Self::with_move_data(false)
    }

    pub fn with_move_data(move_data: bool) -> Self {
        SingleDiskStorage {
            state: State::NotStarted,
            max_n: None,
            move_data,
        }
    }
}

impl Default for SingleDiskStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for SingleDiskStorage {
    fn next_action(&mut self) -> ScheduleResult<Option<Action>> {
        match self.state {
            State::NotStarted => {
                self.state = State::AwaitingFinalize;
                Ok(Some(Action::Forward {
                    n0: 0,
                    n1: INT_MAX,
                    write_ics: false,
                    write_adj_deps: true,
                    storage: StorageKind::Disk,
                }))
            }
            State::AwaitingFinalize => {
                let max_n = self.max_n.ok_or_else(|| {
                    ScheduleError::InternalInvariant(
                        "next_action called before finalize fixed max_n".into(),
                    )
                })?;
                self.state = if max_n > 0 {
                    State::AwaitingRetrieve(max_n)
                } else {
                    State::AwaitingEndReverse
                };
                Ok(Some(Action::EndForward))
            }
            State::AwaitingRetrieve(k) => {
                self.state = State::AwaitingReverse(k);
                let action = if self.move_data {
                    Action::Move {
                        n: k,
                        from_storage: StorageKind::Disk,
                        to_storage: StorageKind::Work,
                    }
                } else {
                    Action::Copy {
                        n: k,
                        from_storage: StorageKind::Disk,
                        to_storage: StorageKind::Work,
                    }
                };
                Ok(Some(action))
            }
            State::AwaitingReverse(k) => {
                self.state = if k > 1 {
                    State::AwaitingRetrieve(k - 1)
                } else {
                    State::AwaitingEndReverse
                };
                trace!(step = k, "reversing step");
                Ok(Some(Action::Reverse {
                    n1: k,
                    n0: k - 1,
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
        true
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

impl_schedule_iterator!(SingleDiskStorage);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_sequence_s3() {
        let mut s = SingleDiskStorage::with_move_data(true);
        s.next_action().unwrap();
        s.finalize(2).unwrap();
        assert_eq!(s.next_action().unwrap(), Some(Action::EndForward));
        assert_eq!(
            s.next_action().unwrap(),
            Some(Action::Move {
                n: 2,
                from_storage: StorageKind::Disk,
                to_storage: StorageKind::Work,
            })
        );
        assert_eq!(
            s.next_action().unwrap(),
            Some(Action::Reverse {
                n1: 2,
                n0: 1,
                clear_adj_deps: true,
            })
        );
        assert_eq!(
            s.next_action().unwrap(),
            Some(Action::Move {
                n: 1,
                from_storage: StorageKind::Disk,
                to_storage: StorageKind::Work,
            })
        );
        assert_eq!(s.next_action().unwrap(), Some(Action::Reverse {
            n1: 1,
            n0: 0,
            clear_adj_deps: true,
        }));
        assert_eq!(s.next_action().unwrap(), Some(Action::EndReverse));
        assert!(s.is_exhausted());
    }

    #[test]
    fn zero_steps_still_emits_end_reverse() {
        let mut s = SingleDiskStorage::new();
        s.next_action().unwrap();
        s.finalize(0).unwrap();
        assert_eq!(s.next_action().unwrap(), Some(Action::EndForward));
        assert_eq!(s.next_action().unwrap(), Some(Action::EndReverse));
        assert!(s.is_exhausted());
    }
}
