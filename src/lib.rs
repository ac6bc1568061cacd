//! # Citbbs Integration Library
//!
//! A typed async client for the citbbs users API:
//! - Create, get, list and delete users
//! - Access token and service token authentication
//! - Page-size and cursor options for list calls
//! - Typed errors that keep request-construction failures apart from
//!   remote ones
//! - Tracing events and request metrics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_citbbs::{CitbbsClient, GetUserRequest, ListOption, ListUsersRequest, UsersService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CitbbsClient::builder()
//!         .access_token("pscale_oauth_xxxxxxxx")
//!         .build()?;
//!
//!     let users = client
//!         .users()
//!         .list(&ListUsersRequest::new("acme"), vec![ListOption::PerPage(25)])
//!         .await?;
//!     for user in users {
//!         println!("{}", user.name);
//!     }
//!
//!     let alice = client.users().get(&GetUserRequest::new("alice")).await?;
//!     println!("{:?}", alice.state);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// Authentication
pub mod auth;

// HTTP transport and client
pub mod transport;
pub mod client;

// List options
pub mod pagination;

// API Services
pub mod services;

// Observability
pub mod observability;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

// Re-exports for convenience
pub use auth::AuthMethod;
pub use client::{CitbbsClient, CitbbsClientBuilder};
pub use config::{CitbbsConfig, CitbbsConfigBuilder};
pub use errors::{CitbbsError, CitbbsErrorKind, CitbbsResult};
pub use pagination::{ListOption, ListOptions};
pub use services::{DefaultUsersService, UsersService};
pub use types::*;
