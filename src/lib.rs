//! cellglow (workspace facade crate).
//!
//! Re-exports the implementation crates under `crates/` as
//! `cellglow::{core,term,types}` and hosts the pieces shared by the demo
//! binary, its tests and benches.

pub mod controls;
pub mod demo;
pub mod logging;

pub use cellglow_core as core;
pub use cellglow_term as term;
pub use cellglow_types as types;
