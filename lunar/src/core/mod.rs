//! Deterministic, pure logic for phase classification.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod astro;
pub mod bucket;
pub mod classifier;
pub mod text;
pub mod types;
pub mod uid;
pub mod window;
