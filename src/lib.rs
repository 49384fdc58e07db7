//! wand - Typed tasks and runners for build automation of Go projects
//!
//! This crate re-exports the [`wand_core`] library.
pub use wand_core::*;
