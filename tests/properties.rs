//! Property tests for stratum.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "deterministic".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/classification.rs"]
mod classification;

#[path = "properties/path_patterns.rs"]
mod path_patterns;
