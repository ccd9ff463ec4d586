//! Error types for the checkpoint schedule engine.
//!
//! Kept deliberately plain: a tagged enum with hand-written `Display`/`Error`
//! impls rather than a derive-macro crate, so every error kind is a distinct,
//! matchable value (never a bare string) and the library never panics.

use std::fmt;

/// Errors surfaced by schedule construction, `finalize`, and iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The configured storage budget cannot solve the requested instance.
    InvalidBudget {
        required: u64,
        snaps_in_ram: u64,
        snaps_on_disk: u64,
    },
    /// `max_n` is non-positive where the algorithm requires a known, positive step count.
    InvalidSteps { max_n: i64 },
    /// `finalize` was called with a value that conflicts with an already-fixed
    /// `max_n`, or that is behind the current forward frontier.
    FinalizeConflict {
        requested: u64,
        current: Option<u64>,
    },
    /// `next_action` was called again after `is_exhausted` became true on a
    /// schedule that does not support re-entry.
    IterationAfterExhausted,
    /// A defensive check tripped; this indicates a bug in the engine, not
    /// misuse by the caller.
    InternalInvariant(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::InvalidBudget {
                required,
                snaps_in_ram,
                snaps_on_disk,
            } => write!(
                f,
                "storage budget too small: need at least {required} checkpoint slot(s), \
                 got snaps_in_ram={snaps_in_ram}, snaps_on_disk={snaps_on_disk}"
            ),
            ScheduleError::InvalidSteps { max_n } => {
                write!(f, "invalid max_n for this algorithm: {max_n}")
            }
            ScheduleError::FinalizeConflict { requested, current } => match current {
                Some(current) => write!(
                    f,
                    "finalize({requested}) conflicts with already-fixed max_n={current}"
                ),
                None => write!(
                    f,
                    "finalize({requested}) is behind the current forward frontier"
                ),
            },
            ScheduleError::IterationAfterExhausted => {
                write!(f, "next_action called after the schedule was exhausted")
            }
            ScheduleError::InternalInvariant(msg) => {
                write!(f, "internal invariant violated: {msg}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// Crate-wide result alias.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
