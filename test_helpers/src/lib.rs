//! Test helpers shared across crates in the workbench workspace.
//!
//! [`figment`] wraps `figment::Jail` for settings tests, [`logs`] captures
//! `tracing` output and [`table`] provides an in-memory persistence
//! collaborator for models under test.

pub mod figment;
pub mod logs;
pub mod table;

pub use table::{Table, matches};
