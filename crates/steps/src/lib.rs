//! Reusable Cucumber step definitions for Salesforce Lightning acceptance
//! tests.
//!
//! The harness wires a driver pool and an engine into [`LexWorld`] (usually
//! in a `before` hook), registers credentials and named values, and then
//! runs its feature files; every step here resolves the per-scenario
//! [`lexbdd_runtime::Session`] out of the world.

mod actions;
mod assertions;
mod table;
mod world;

pub use world::LexWorld;
