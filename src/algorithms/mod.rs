//! Concrete [`crate::schedule::Schedule`] implementations, one module per
//! algorithm (§4.2, §4.3, §4.6–§4.8).

pub mod disk_revolve;
pub mod h_revolve;
pub mod mixed;
pub mod multistage;
pub mod none;
pub mod periodic_disk_revolve;
pub mod revolve;
pub mod single_disk;
pub mod single_memory;
pub mod two_level;

pub use disk_revolve::DiskRevolve;
pub use h_revolve::HRevolve;
pub use mixed::Mixed;
pub use multistage::Multistage;
pub use none::NoSchedule;
pub use periodic_disk_revolve::PeriodicDiskRevolve;
pub use revolve::Revolve;
pub use single_disk::SingleDiskStorage;
pub use single_memory::{SingleMemoryStorage, SingleMemoryStorageBuilder};
pub use two_level::TwoLevel;
