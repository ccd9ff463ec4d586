//! The public action model: the vocabulary every schedule emits, and the
//! storage-kind tags used throughout the engine.

use std::fmt;

/// Non-negative step index into the forward trajectory `[0, max_n]`.
pub type Step = u64;

/// Sentinel meaning "as far as the driver will go" for online schedules whose
/// `max_n` is not yet known. Replaced internally once `finalize` fixes `max_n`.
pub const INT_MAX: Step = i64::MAX as u64;

/// Where a step's data currently lives (or is requested to move to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Fast, capacity-limited memory.
    Ram,
    /// Slow, capacity-limited disk.
    Disk,
    /// The driver's ephemeral "live" buffer for the step currently being
    /// processed. Never persisted, never counted against a budget.
    Work,
    /// Explicit "no storage" marker used by the [`crate::algorithms::none::None`] schedule.
    NoStorage,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageKind::Ram => "RAM",
            StorageKind::Disk => "DISK",
            StorageKind::Work => "WORK",
            StorageKind::NoStorage => "NONE",
        };
        write!(f, "{s}")
    }
}

/// One unit of work a driver must perform to advance a checkpointed adjoint
/// computation. This is the entire external surface of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Advance the forward solver from the start of step `n0` to the start of
    /// step `n1` (`n1 > n0`).
    Forward {
        n0: Step,
        n1: Step,
        write_ics: bool,
        write_adj_deps: bool,
        storage: StorageKind,
    },
    /// Advance the adjoint solver from step `n1` back to step `n0` (`n0 < n1`).
    Reverse {
        n1: Step,
        n0: Step,
        clear_adj_deps: bool,
    },
    /// Duplicate step `n`'s data from one storage kind to another; the source
    /// retains its copy.
    Copy {
        n: Step,
        from_storage: StorageKind,
        to_storage: StorageKind,
    },
    /// Relocate step `n`'s data; the source no longer holds it afterwards.
    Move {
        n: Step,
        from_storage: StorageKind,
        to_storage: StorageKind,
    },
    /// Terminator emitted exactly once, after the last forward action, when
    /// forward has reached `max_n`.
    EndForward,
    /// Terminator emitted when the adjoint has returned to step 0.
    EndReverse,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Forward {
                n0,
                n1,
                write_ics,
                write_adj_deps,
                storage,
            } => write!(
                f,
                "Forward({n0}, {n1}, write_ics={write_ics}, write_adj_deps={write_adj_deps}, {storage})"
            ),
            Action::Reverse {
                n1,
                n0,
                clear_adj_deps,
            } => write!(f, "Reverse({n1}, {n0}, clear_adj_deps={clear_adj_deps})"),
            Action::Copy {
                n,
                from_storage,
                to_storage,
            } => write!(f, "Copy({n}, {from_storage}, {to_storage})"),
            Action::Move {
                n,
                from_storage,
                to_storage,
            } => write!(f, "Move({n}, {from_storage}, {to_storage})"),
            Action::EndForward => write!(f, "EndForward"),
            Action::EndReverse => write!(f, "EndReverse"),
        }
    }
}
