//! Common test utilities for stratum contract and property tests.
//!
//! This module provides:
//! - `TestProject`: an isolated project directory with a builder for sources
//! - `TestResult`: captured output of a `stratum` CLI run
//! - Fixtures: a small todo app exercising all three layers

#![allow(dead_code)]

pub mod fixtures;
pub mod project;

pub use fixtures::*;
pub use project::*;
