//! # Aegis - User Management Server
//!
//! A user-management backend: account creation, profile updates,
//! authentication via signed bearer tokens, and role-based access control,
//! fronted by a thin Axum API.
//!
//! ## Overview
//!
//! Aegis can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `aegis-server` binary
//! 2. **As a library** - Import the auth core into your own Rust project
//!
//! The core is four small, stateless components:
//!
//! - [`auth::password::PasswordHasher`] - salted one-way hashing and
//!   constant-time verification of credentials
//! - [`auth::token::TokenCodec`] - signed, expiring claims bundles
//! - [`auth::access`] - pure allow/deny decisions from per-operation rules
//! - [`auth::gateway::AuthGateway`] - bearer extraction, decoding, identity
//!   lookup and stale-role defense per request
//!
//! Everything else (routing, schemas, the in-memory store) is glue around
//! those four.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use aegis::auth::{gateway::AuthGateway, token::TokenCodec};
//! use chrono::Duration;
//! use std::sync::Arc;
//!
//! let codec = Arc::new(TokenCodec::new("a-32-char-minimum-signing-secret!", Duration::minutes(15)));
//! let gateway = AuthGateway::new(codec.clone());
//!
//! let token = codec.issue(&user_id, role, None)?;
//! let principal = gateway
//!     .authenticate(Some(&format!("Bearer {token}")), |id| load_user(id))
//!     .await?;
//! ```
//!
//! ## Configuration
//!
//! Configure via environment variables (a `.env` file is honored):
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JWT_SECRET` | required | Token signing secret |
//! | `ACCESS_TOKEN_TTL_MINUTES` | 15 | Token lifetime |
//! | `HASH_COST` | 3 | Argon2id time cost |
//! | `MAX_LOGIN_ATTEMPTS` | 3 | Failed logins before lockout |
//! | `UPGRADE_TOKEN_TTL_HOURS` | 24 | Profile-upgrade token lifetime |
//! | `ADMIN_EMAIL` / `ADMIN_PASSWORD` | admin@example.com / secret | Bootstrap admin account |

/// HTTP API handlers and routes.
pub mod api;
/// Authentication and authorization core.
pub mod auth;
/// Identity store trait and in-memory backend.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{MemoryStore, UserStore};
pub use types::{AppError, Result};
pub use utils::config::Config;

use crate::auth::{gateway::AuthGateway, password::PasswordHasher, token::TokenCodec};
use chrono::Duration;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable application configuration
    pub config: Arc<Config>,
    /// Identity store collaborator
    pub store: Arc<dyn UserStore>,
    /// Password hashing service
    pub hasher: Arc<PasswordHasher>,
    /// Session token codec
    pub codec: Arc<TokenCodec>,
    /// Per-request authentication gateway
    pub gateway: Arc<AuthGateway>,
}

impl AppState {
    /// Builds the component graph from configuration and a store.
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> Self {
        let codec = Arc::new(TokenCodec::new(
            &config.auth.jwt_secret,
            Duration::minutes(config.auth.access_token_ttl_minutes),
        ));
        let gateway = Arc::new(AuthGateway::new(codec.clone()));
        let hasher = Arc::new(PasswordHasher::new(config.auth.hash_cost));

        Self {
            config: Arc::new(config),
            store,
            hasher,
            codec,
            gateway,
        }
    }
}
