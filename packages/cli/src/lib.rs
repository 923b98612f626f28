// ABOUTME: Server and admin tooling for Storefront
// ABOUTME: Environment configuration, HTTP middleware, and server assembly

pub mod config;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, build_state, prepare_state, run_server};
