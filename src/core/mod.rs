// src/core/mod.rs

/// Data structures shared by the collectors, the aggregator and the UI,
/// such as `Report`, `Session` and the per-source payloads.
pub mod models;

/// The four collectors and the `run_full_scan` aggregator.
pub mod scanner;

/// Registration-date parsing and normalization.
pub mod dates;

/// Rules that turn a collected report into flags.
pub mod heuristics;

/// Human-readable explanations for every flag.
pub mod knowledge_base;

/// Report serialization and persistence.
pub mod report;
