//! Test infrastructure for the persistence layer.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;
