//! HTTP API Handlers and Routes
//!
//! The REST layer over the auth core: thin glue that wires requests into
//! handlers, declares each operation's access rule, and surfaces
//! [`AppError`](crate::types::AppError) as HTTP statuses.
//!
//! # Endpoints
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | POST | `/auth/register` | public |
//! | POST | `/auth/login` | public |
//! | GET | `/me` | authenticated |
//! | POST | `/users` | admin |
//! | GET | `/users` | admin |
//! | GET | `/users/{id}` | admin or owner |
//! | PUT | `/users/{id}` | admin or owner |
//! | DELETE | `/users/{id}` | admin |
//! | POST | `/profile/upgrade` | authenticated |
//! | POST | `/profile/upgrade/confirm` | authenticated |

/// API request handlers.
pub mod handlers;
/// Router construction.
pub mod routes;

use crate::types::{
    AccountStatus, CreateUserRequest, LoginRequest, MessageResponse, RegisterRequest, Role,
    TokenResponse, UpgradeConfirmRequest, UpgradeTokenResponse, UserResponse, UserUpdate,
};
use utoipa::OpenApi;

/// OpenAPI document for the user-management API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::users::me,
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::profile::request_upgrade,
        handlers::profile::confirm_upgrade,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        CreateUserRequest,
        UserUpdate,
        UserResponse,
        UpgradeConfirmRequest,
        UpgradeTokenResponse,
        MessageResponse,
        Role,
        AccountStatus,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User account management"),
        (name = "profile", description = "Professional upgrade flow"),
    )
)]
pub struct ApiDoc;
