//! # teamdesk-app
//!
//! Wires the in-memory collaborators into a `ServiceContext` and drives one
//! user's dashboard session until Ctrl-C.

pub mod bootstrap;

pub use bootstrap::{build_workspace, run, Workspace};
