//! # nota-core
//!
//! Core types, traits, and abstractions for the nota note-taking system.
//!
//! This crate provides the data model, error taxonomy, tag normalization,
//! and the `NoteStore` trait that store backends implement.

pub mod error;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use tags::*;
pub use traits::*;
