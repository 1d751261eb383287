//! Authentication and Authorization Core
//!
//! This module provides the authentication infrastructure for the Aegis API:
//! password hashing, signed session tokens, access decisions and the
//! per-request gateway that ties them together.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing and verification
//! - [`auth::token`](crate::auth::token) - Session token encoding, decoding, and claims
//! - [`auth::access`](crate::auth::access) - Per-operation access rules and the pure decision function
//! - [`auth::gateway`](crate::auth::gateway) - Bearer-token authentication against the identity store
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor for protected routes
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id (memory-hard) with a configurable cost factor
//! - **Session Tokens**: HS256 signed tokens with configurable expiration
//! - **Access Control**: deny-by-default role/ownership rules declared per operation
//!
//! # Usage
//!
//! ## Issuing a token
//!
//! ```ignore
//! use aegis::auth::token::TokenCodec;
//!
//! let codec = TokenCodec::new(&config.auth.jwt_secret, ttl);
//! let token = codec.issue(&user.id.to_string(), user.role, Some(user.status))?;
//! ```
//!
//! ## Protecting routes
//!
//! The auth middleware resolves a [`Principal`](crate::types::Principal) per
//! request and injects it into the request extensions:
//!
//! ```ignore
//! use aegis::auth::middleware::auth_middleware;
//!
//! let app = Router::new()
//!     .route("/users", get(handler))
//!     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```
//!
//! ## Declaring access rules in handlers
//!
//! ```ignore
//! static DELETE_USER: AccessRule = AccessRule::roles(&[Role::Admin]);
//!
//! async fn delete_user(AuthUser(principal): AuthUser) -> Result<...> {
//!     state.gateway.authorize(&principal, &DELETE_USER, Some(target_id))?;
//!     // ...
//! }
//! ```

/// Per-operation access rules and the pure allow/deny decision.
pub mod access;
/// Bearer-token authentication orchestration against the identity store.
pub mod gateway;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing and verification.
pub mod password;
/// Session token issuance and validation.
pub mod token;
