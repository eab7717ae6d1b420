//! Scenario tests driving whole worlds through many frames.
//!
//! - **Determinism tests**: same level, seed and inputs give identical runs
//! - **Integration tests**: agent cycles, items and combat end to end
//! - **Helper functions**: level builders and stepping utilities
//!
//! # Test Structure
//!
//! - `determinism.rs`: replay and event-log independence checks
//! - `integration.rs`: end-to-end gameplay scenarios
//! - `helpers.rs`: test setup utilities and inspection shortcuts

mod helpers;

pub use helpers::*;
