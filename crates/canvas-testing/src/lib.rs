//! Shared integration-test scaffolding for the Canvas change-detection
//! engine, mirroring the teacher crate's `agtrace-testing`: a `TestWorld`
//! builder for isolated CLI runs, plus fixture HTML/JSON samples every
//! other crate's `tests/` directory can reach for instead of inlining
//! its own copy.

pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
