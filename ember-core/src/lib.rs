//! # Ember Core
//!
//! Core types, errors, and traits for the ember aggregation service.
//!
//! This crate provides the foundational building blocks used by all other
//! ember crates:
//!
//! - **Types**: Domain models for items, pages, and the id listing
//! - **Errors**: The error taxonomy for upstream and cache operations
//! - **Traits**: The [`ItemSource`] seam between the aggregation layer and
//!   the remote catalog
//!
//! ## Example
//!
//! ```rust
//! use ember_core::{Item, ItemKind};
//!
//! let item = Item {
//!     id: 1,
//!     title: "Ember ships".into(),
//!     url: None,
//!     by: "pg".into(),
//!     time: 1_700_000_000,
//!     score: 42,
//!     descendants: Some(7),
//!     kind: ItemKind::Story,
//! };
//! let json = serde_json::to_string(&item).unwrap();
//! assert!(json.contains("\"type\":\"story\""));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EmberError, Result};
pub use traits::*;
pub use types::*;
