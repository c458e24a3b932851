//! Shared utilities and common types for the attendance client.
//!
//! This crate provides common functionality used across all other crates:
//! - Transport envelope types for the attendance REST API
//! - The `Loadable` async-state container
//! - Session credential storage and entry-point navigation abstractions
//! - Common validation logic

pub mod envelope;
pub mod loadable;
pub mod session;
pub mod validation;
