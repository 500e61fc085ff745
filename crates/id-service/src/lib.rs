//! Identity provider: issues and validates HS256 bearer tokens for a demo
//! tenant, backed by a static in-memory credential store.

#![warn(clippy::pedantic)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
