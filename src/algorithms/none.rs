//! The trivial "no adjoint" schedule (§4.2, algorithm name `None` in the
//! constructor table — named [`NoSchedule`] here since `None` is already
//! taken by `Option` in every module's prelude).

use tracing::debug;

use crate::action::{Action, Step, StorageKind, INT_MAX};
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{impl_schedule_iterator, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    AwaitingFinalize,
    Exhausted,
}

/// Runs the forward computation and nothing else: no checkpoints, no
/// adjoint. Used as a baseline and for forward-only drivers.
#[derive(Debug, Clone)]
pub struct NoSchedule {
    state: State,
    max_n: Option<Step>,
}

impl NoSchedule {
    pub fn new() -> Self {
        NoSchedule {
            state: State::NotStarted,
            max_n: None,
        }
    }
}

impl Default for NoSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for NoSchedule {
    fn next_action(&mut self) -> ScheduleResult<Option<Action>> {
        match self.state {
            State::NotStarted => {
                self.state = State::AwaitingFinalize;
                Ok(Some(Action::Forward {
                    n0: 0,
                    n1: INT_MAX,
                    write_ics: false,
                    write_adj_deps: false,
                    storage: StorageKind::NoStorage,
                }))
            }
            State::AwaitingFinalize => {
                if self.max_n.is_none() {
                    return Err(ScheduleError::InternalInvariant(
                        "next_action called before finalize fixed max_n".into(),
                    ));
                }
                self.state = State::Exhausted;
                debug!("schedule exhausted");
                Ok(Some(Action::EndForward))
            }
            State::Exhausted => Err(ScheduleError::IterationAfterExhausted),
        }
    }

    fn max_n(&self) -> Option<Step> {
        self.max_n
    }

    fn uses_disk_storage(&self) -> bool {
        false
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

impl_schedule_iterator!(NoSchedule);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_sequence_s1() {
        let mut s = NoSchedule::new();
        assert_eq!(
            s.next_action().unwrap(),
            Some(Action::Forward {
                n0: 0,
                n1: INT_MAX,
                write_ics: false,
                write_adj_deps: false,
                storage: StorageKind::NoStorage,
            })
        );
        s.finalize(10).unwrap();
        assert_eq!(s.next_action().unwrap(), Some(Action::EndForward));
        assert!(s.is_exhausted());
        assert!(s.next_action().is_err());
    }

    #[test]
    fn finalize_is_idempotent_but_rejects_conflicts() {
        let mut s = NoSchedule::new();
        s.finalize(5).unwrap();
        s.finalize(5).unwrap();
        assert!(s.finalize(6).is_err());
    }
}
