//! Checkpointing schedules for reverse-mode (adjoint) computation over
//! time-stepped simulations.
//!
//! Given a forward computation of `max_n` steps and a bounded checkpoint
//! budget across RAM and disk, a [`schedule::Schedule`] emits a deterministic
//! stream of [`action::Action`]s that a driver executes to advance the
//! forward solver, save/restore state, and run the adjoint solver backward,
//! minimizing recomputation subject to the storage budget.
//!
//! The crate does not perform any numerical computation, storage I/O, or
//! driver loop itself — it only plans. See [`algorithms`] for the available
//! planners, from the trivial [`algorithms::none::NoSchedule`] up through the
//! Revolve family and [`algorithms::two_level::TwoLevel`].

pub mod action;
pub mod algorithms;
pub mod compiler;
pub mod cost;
pub mod error;
pub mod lowop;
pub mod schedule;
pub mod table;

pub use action::{Action, Step, StorageKind, INT_MAX};
pub use cost::CostParams;
pub use error::{ScheduleError, ScheduleResult};
pub use schedule::Schedule;

pub use algorithms::{
    DiskRevolve, HRevolve, Mixed, Multistage, NoSchedule, PeriodicDiskRevolve, Revolve,
    SingleDiskStorage, SingleMemoryStorage, TwoLevel,
};
