//! Shared building blocks used by every clinicavet crate.
//!
//! This crate sits at the bottom of the dependency graph: it must never
//! depend on another workspace crate.

pub mod error;
pub mod messages;
pub mod pagination;

pub use error::{DomainError, DomainResult};
pub use pagination::{Page, SortOrder};
