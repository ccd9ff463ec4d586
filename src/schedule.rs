//! The `Schedule` trait: the single interface every algorithm in
//! [`crate::algorithms`] implements. Mirrors the existing crate's `Decider`
//! trait (`decide_machine`, `decider_run_batch`) in shape: one required
//! "produce the next unit of work" method, plus a handful of status queries.

use crate::action::{Action, Step};
use crate::error::ScheduleResult;

/// A deterministic, stateful producer of [`Action`]s.
///
/// Implementors drive a pre-computed (or, for online schedules, lazily
/// extended) plan one action at a time. `next_action` returns `Ok(None)`
/// once the schedule is exhausted; calling it again after that is an error
/// for schedules that do not support re-entry (§7 `IterationAfterExhausted`).
pub trait Schedule {
    /// Produce the next action, or `None` if the schedule is exhausted.
    fn next_action(&mut self) -> ScheduleResult<Option<Action>>;

    /// The fixed step count, if known. `None` for an online schedule whose
    /// `max_n` has not yet been fixed via [`Schedule::finalize`].
    fn max_n(&self) -> Option<Step>;

    /// Whether this schedule may ever emit an action referencing `Disk`.
    fn uses_disk_storage(&self) -> bool;

    /// Whether the schedule has emitted its terminal `EndReverse`.
    fn is_exhausted(&self) -> bool;

    /// Fix `max_n` for an online schedule. Idempotent when called again with
    /// the same value; an error on conflict (§4.9, §7 `FinalizeConflict`).
    fn finalize(&mut self, n1: Step) -> ScheduleResult<()>;
}

/// Implements `Iterator<Item = Result<Action, ScheduleError>>` for a
/// concrete [`Schedule`] type by forwarding to `next_action`, per §3's
/// "implementors also implement `Iterator`" convenience-wrapper rule. Spares
/// every algorithm module the same four lines of boilerplate.
macro_rules! impl_schedule_iterator {
    ($ty:ty) => {
        impl Iterator for $ty {
            type Item = $crate::error::ScheduleResult<$crate::action::Action>;

            fn next(&mut self) -> Option<Self::Item> {
                match $crate::schedule::Schedule::next_action(self) {
                    Ok(Some(action)) => Some(Ok(action)),
                    Ok(None) => None,
                    Err(e) => Some(Err(e)),
                }
            }
        }
    };
}

pub(crate) use impl_schedule_iterator;
