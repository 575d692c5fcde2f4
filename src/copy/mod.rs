//! This module defines the hierarchy copy engine of rigcopy.
//!
//! Copying happens in two steps. A source hierarchy is first captured into a
//! [`Snapshot`], a detached description of each node's name, local transform
//! and selected components. The snapshot is then applied to any number of
//! target hierarchies, pairing nodes up by name level by level.
//!
//! Targets rarely have exactly the shape of the source. Outfits bring their
//! own armatures with extra bones, missing bones, or bones that were renamed
//! by whoever rigged them. Apply never fails because of that: nodes it can't
//! pair up are skipped and counted, and everything that could be paired gets
//! updated.
//!
//! The engine only talks to the host through the traits in [`model`], so the
//! same code drives the in-memory rig used by the CLI and tests.

pub mod model;

mod apply;
mod capture;
mod classify;
mod discover;
mod filter;
mod snapshot;

#[cfg(test)]
mod tests;

pub use apply::*;
pub use capture::capture;
pub use classify::*;
pub use discover::*;
pub use filter::*;
pub use model::*;
pub use snapshot::*;
