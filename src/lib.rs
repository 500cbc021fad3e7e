//! Matchday Backend Library
//!
//! Exposes core modules for use by the binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod enrollment;
pub mod error;
pub mod league;
pub mod middleware;
pub mod models;
