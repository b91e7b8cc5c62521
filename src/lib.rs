//! Agent-based modeling framework.
//!
//! Core objects: `Model` and `Agent`. The `time`, `space`, and
//! `visualization` modules provide activation schedulers, spatial
//! structures, and terminal rendering; `DataCollector` gathers run data.

pub mod model;
pub mod agent;
pub mod time;
pub mod space;
pub mod visualization;
pub mod datacollection;

pub mod common;
pub mod config;
pub mod logging;
pub mod meta;
pub mod runner;

pub use model::{seeded_rng, Model};
pub use agent::Agent;
pub use datacollection::DataCollector;
pub use config::Config;
pub use meta::{package_info, PackageInfo};

// Re-export common types
pub use common::*;
