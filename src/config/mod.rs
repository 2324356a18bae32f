//! Configuration Resolution
//!
//! Turns flags, a batch string, or guided prompting into a single validated
//! [`ProvisioningRequest`].

pub mod request;
pub mod resolver;

pub use request::*;
pub use resolver::*;
