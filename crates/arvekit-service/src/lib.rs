//! Arvekit HTTP API Service.
//!
//! This crate provides the HTTP API for arvekit, including:
//!
//! - Business profile management (onboarding, document configuration)
//! - Client and service-catalog management
//! - Quote and invoice creation with sequential document numbering
//! - Dashboard aggregates
//! - Business registry autocomplete proxy
//!
//! # Authentication
//!
//! Every `/v1` route requires a Bearer HS256 JWT whose `sub` claim is the
//! calling account id.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async only for routing consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use registry::{RegistryClient, RegistryError};
pub use routes::create_router;
pub use state::AppState;
