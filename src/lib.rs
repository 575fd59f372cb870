//! Surgical Scope: cancer surgery volumes by year, procedure and region.
//!
//! The [`data`] module holds everything the dashboard computes; the binary
//! only renders it.

pub mod config;
pub mod data;
