//! shopfloor-core
//!
//! Orchestration core of a simulated job shop: task sets flow from a pickup
//! facility through welding, assembly and painting stations to dropoff,
//! carried by transport workers and served by crews drawn from role pools.
//!
//! # Modules
//! - **domain**: ids, station types and roles, tasks, progress events
//! - **ports**: traits at the seams (Clock, EventSink, Workload, FaultHandler)
//! - **impls**: in-process implementations of the ports
//! - **pool**: the idle set of one kind of worker or facility
//! - **app**: actors, builder and the `Floor` handle
//! - **config**: TOML floor configuration
//! - **observability**: pool and completion snapshots

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod pool;
pub mod ports;

pub use self::app::{Floor, FloorBuilder};
pub use self::config::{FloorConfig, Timings};
pub use self::error::{BuildError, ConfigError, FloorError, SubmitError};
pub use self::observability::{FloorCounts, PoolCount};
