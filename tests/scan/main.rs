//! End-to-end scans over stores shaped like a transaction layer's table

#[path = "../common/mod.rs"]
mod common;

mod configuration;
mod conflict_detection;
