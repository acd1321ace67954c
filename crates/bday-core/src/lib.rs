//! Core types and trait definitions for the birthday calendar sync.
//!
//! This crate is deliberately free of parsing and database dependencies.
//! All other crates depend on it; it depends on nothing store-specific.

pub mod birthday;
pub mod change;
pub mod error;
pub mod event;
pub mod store;

pub use error::{Error, Result};
