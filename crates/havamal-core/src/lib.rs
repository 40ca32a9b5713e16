//! # Havamal Core
//!
//! The domain layer of the Havamal blog backend: posts, categories, the
//! navigation menu and post revision history, with the rules that keep them
//! consistent.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
