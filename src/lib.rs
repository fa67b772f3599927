//! Job postings backend: SQL builders, the job repository, and its HTTP surface.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
