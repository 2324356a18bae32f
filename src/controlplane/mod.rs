//! Control Plane Adapters
//!
//! Concrete implementations of the [`ControlPlaneClient`] port:
//! - [`rest`]: the real HTTPS/JSON management API
//! - [`dryrun`]: a wrapper that reports mutations instead of performing them
//!
//! [`ControlPlaneClient`]: crate::domain::ports::ControlPlaneClient

pub mod dryrun;
pub mod rest;

#[cfg(test)]
pub mod mock;

pub use dryrun::*;
pub use rest::*;
