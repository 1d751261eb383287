use crate::{
    auth::access::AccessRule,
    auth::middleware::AuthUser,
    types::{
        AppError, CreateUserRequest, MessageResponse, Result, Role, User, UserResponse, UserUpdate,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

static CREATE_USER: AccessRule = AccessRule::roles(&[Role::Admin]);
static LIST_USERS: AccessRule = AccessRule::roles(&[Role::Admin]);
static READ_USER: AccessRule = AccessRule::roles_or_self(&[Role::Admin]);
static UPDATE_USER: AccessRule = AccessRule::roles_or_self(&[Role::Admin]);
static DELETE_USER: AccessRule = AccessRule::roles(&[Role::Admin]);
static READ_SELF: AccessRule = AccessRule::self_only();

/// Path ids that do not parse map onto the same 404 a missing record gets.
fn parse_user_id(raw: &str) -> Result<Uuid> {
    raw.parse::<Uuid>()
        .map_err(|_| AppError::NotFound("User not found".to_string()))
}

async fn load_user(state: &AppState, id: Uuid) -> Result<User> {
    state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Fetch the calling user's own profile
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<UserResponse>> {
    state
        .gateway
        .authorize(&principal, &READ_SELF, Some(principal.id))?;

    let user = load_user(&state, principal.id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Create a user account (admin operation)
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input or email already taken"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>> {
    state.gateway.authorize(&principal, &CREATE_USER, None)?;

    if payload.email.is_empty() || payload.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Email required and password must be at least 8 characters".to_string(),
        ));
    }

    if state.store.get_by_email(&payload.email).await.is_some() {
        return Err(AppError::InvalidInput("User already exists".to_string()));
    }

    let password_hash = super::auth::hash_blocking(&state, payload.password).await?;

    let nickname = payload
        .nickname
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| payload.email.split('@').next().unwrap_or_default().to_string());
    let role = payload.role.unwrap_or(Role::User);
    let user = User::new(payload.email, nickname, password_hash, role);

    let response = UserResponse::from(&user);
    state.store.create(user).await?;

    Ok(Json(response))
}

/// List all user accounts (admin operation)
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<UserResponse>>> {
    state.gateway.authorize(&principal, &LIST_USERS, None)?;

    let users = state.store.list().await;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Fetch a user account
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The account", body = UserResponse),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "No such account")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user_id = parse_user_id(&id)?;
    state
        .gateway
        .authorize(&principal, &READ_USER, Some(user_id))?;

    let user = load_user(&state, user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Update a user profile
///
/// The body is taken as raw JSON and parsed against the allow-listed patch
/// struct so unknown keys and empty patches surface as 400 rather than a
/// generic deserialization rejection.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Unknown field or empty patch"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "No such account")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<UserResponse>> {
    let user_id = parse_user_id(&id)?;
    state
        .gateway
        .authorize(&principal, &UPDATE_USER, Some(user_id))?;

    let patch: UserUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid update payload: {e}")))?;

    if patch.is_empty() {
        return Err(AppError::InvalidInput(
            "No fields to update".to_string(),
        ));
    }

    let mut user = load_user(&state, user_id).await?;

    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(nickname) = patch.nickname {
        user.nickname = nickname;
    }
    if let Some(first_name) = patch.first_name {
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = patch.last_name {
        user.last_name = Some(last_name);
    }
    if let Some(bio) = patch.bio {
        user.bio = Some(bio);
    }
    if let Some(password) = patch.password {
        if password.len() < 8 {
            return Err(AppError::InvalidInput(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        user.password_hash = super::auth::hash_blocking(&state, password).await?;
    }
    user.updated_at = chrono::Utc::now();

    let response = UserResponse::from(&user);
    state.store.update(user).await?;

    Ok(Json(response))
}

/// Delete a user account (admin operation)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such account")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let user_id = parse_user_id(&id)?;
    state
        .gateway
        .authorize(&principal, &DELETE_USER, Some(user_id))?;

    state.store.delete(user_id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted.".to_string(),
    }))
}
