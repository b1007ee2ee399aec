//! Reusable fixtures for friendship tests

pub mod social;

pub use social::*;
