//! Shared utilities for the identity provider and app gateway services.

#![warn(clippy::pedantic)]

/// Module for JWT claims and bearer-credential utilities
pub mod jwt;
