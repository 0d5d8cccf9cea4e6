//! Contract tests for stratum.
//!
//! Contracts are invariants that must ALWAYS hold.
//! A failing contract test is a P0 bug.
//!
//! Run with: cargo test --test contracts

mod common;

#[path = "contracts/entries.rs"]
mod entries;

#[path = "contracts/layers.rs"]
mod layers;

#[path = "contracts/routing.rs"]
mod routing;

#[path = "contracts/hot.rs"]
mod hot;

#[path = "contracts/cli.rs"]
mod cli;
