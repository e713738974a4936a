//! Common test utilities for HTTP API testing.
//!
//! - [`harness`] - Test servers over the memory backend and a failing store
//! - [`fixtures`] - Lead row fixtures

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
