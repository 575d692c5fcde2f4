//! rigcopy copies bone transforms and components between armature
//! hierarchies that share a naming convention.
//!
//! The engine lives in [`copy`] and only depends on the capability traits in
//! [`copy::model`]. [`rig`] provides an in-memory host for them, used by the
//! `rigcopy` binary and the tests.

pub mod cli;
pub mod config;
pub mod copy;
pub mod rig;

mod error;
mod json;

pub use crate::error::ErrorDisplay;
