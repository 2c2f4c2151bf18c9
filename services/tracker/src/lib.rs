//! Exercise tracker service
//!
//! Records users and their exercise log entries and serves a filtered,
//! capped view of each user's history over a small JSON API.

pub mod config;
pub mod dates;
pub mod error;
pub mod extract;
pub mod log_query;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
