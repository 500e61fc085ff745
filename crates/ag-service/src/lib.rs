//! Application gateway: authenticates bearer tokens against a remote
//! identity provider and forwards authenticated requests to a backend
//! with provenance headers attached.

#![warn(clippy::pedantic)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
