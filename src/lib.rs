//! Workspace placeholder crate.
//!
//! This crate exists so that host applications can depend on a single
//! `camsync-workspace` package and reach the individual workspace crates
//! (`bridge-traits`, `core-runtime`, `core-sync`) without wiring each one
//! individually.

pub use bridge_traits;
pub use core_runtime;
pub use core_sync;
