//! Integration test utilities for teamdesk
//!
//! This crate wires the services to the in-memory store, identity provider
//! and export sink so scenarios can run end to end.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
