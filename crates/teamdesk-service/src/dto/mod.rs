//! Data Transfer Objects (DTOs)
//!
//! Request and response types for dashboard actions.

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
