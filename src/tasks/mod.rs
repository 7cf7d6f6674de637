//! Background Tasks Module
//!
//! Contains the cache maintenance loop and the lifetime signal that stops it.
//!
//! # Tasks
//! - Maintenance: Evicts overflow entries and refreshes statistics at a fixed interval

mod maintenance;
mod shutdown;

pub use maintenance::spawn_maintenance_task;
pub use shutdown::{shutdown_channel, ShutdownToken, ShutdownTrigger};
