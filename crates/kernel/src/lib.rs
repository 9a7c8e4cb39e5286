//! VirtuSys site kernel library.
//!
//! Content blocks, pages, hero slides, per-site settings, and the HTTP
//! server that renders them. The `virtusys` binary is a thin wrapper over
//! [`cli::Cli`].

pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod home_api;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod theme;

pub use config::Config;
pub use state::AppState;
