//! Configuration and sample workload for the sporedis demo binary.

mod config;
mod demo;
mod samples;

pub use config::{IndexConfig, SporedisConfig};
pub use demo::{Demo, DemoReport};
pub use samples::{sample_customers, sample_events};
