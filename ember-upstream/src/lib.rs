//! Hacker News Firebase API client.
//!
//! Thin abstraction over the two operations the upstream catalog offers:
//! the newest-items id listing and a fetch of one item by id.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod client;

pub use client::{HnClient, HnConfig};
