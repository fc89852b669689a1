//! # zowe-gateway
//!
//! REST API gateway front for z/OS services.
//!
//! This crate provides:
//! - Configuration loading ([`config`])
//! - The sample API routes, including token login ([`routes`])
//! - Router assembly behind the auth layer, and the listener ([`server`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use server::{build_router, serve};
