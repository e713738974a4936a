//! HTTP middleware for the Leadboard API.
//!
//! - [`auth`] - Session token verification for data routes

pub mod auth;

pub use auth::{Claims, auth_middleware};
