use crate::{
    types::{AppError, LoginRequest, RegisterRequest, Result, Role, TokenResponse, User},
    AppState,
};
use axum::{extract::State, Json};

/// Offloads password hashing to a blocking worker; argon2 would otherwise
/// stall the cooperative scheduler for its full duration.
pub(crate) async fn hash_blocking(state: &AppState, password: String) -> Result<String> {
    let hasher = state.hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
        .map_err(AppError::from)
}

async fn verify_blocking(state: &AppState, password: String, encoded: String) -> Result<bool> {
    let hasher = state.hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?
        .map_err(AppError::from)
}

fn bearer_response(state: &AppState, user: &User) -> Result<TokenResponse> {
    let access_token = state
        .codec
        .issue(&user.id.to_string(), user.role, Some(user.status))?;

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.codec.ttl().num_seconds(),
    })
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid input or email already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    // Validate input
    if payload.email.is_empty() || payload.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Email required and password must be at least 8 characters".to_string(),
        ));
    }

    // Check if user exists
    if state.store.get_by_email(&payload.email).await.is_some() {
        return Err(AppError::InvalidInput("User already exists".to_string()));
    }

    let password_hash = hash_blocking(&state, payload.password).await?;

    let nickname = payload
        .nickname
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| local_part(&payload.email));
    let user = User::new(payload.email, nickname, password_hash, Role::User);

    let tokens = bearer_response(&state, &user)?;
    state.store.create(user).await?;

    Ok(Json(tokens))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    // Unknown account, wrong password and locked account all surface as the
    // same rejection.
    let Some(mut user) = state.store.get_by_email(&payload.email).await else {
        return Err(AppError::Credentials);
    };

    if user.is_locked {
        return Err(AppError::Credentials);
    }

    let password_ok =
        verify_blocking(&state, payload.password, user.password_hash.clone()).await?;

    if !password_ok {
        user.failed_login_attempts += 1;
        if user.failed_login_attempts >= state.config.auth.max_login_attempts {
            user.is_locked = true;
            tracing::warn!(user_id = %user.id, "account locked after repeated failed logins");
        }
        state.store.update(user).await?;
        return Err(AppError::Credentials);
    }

    if user.failed_login_attempts > 0 {
        user.failed_login_attempts = 0;
        state.store.update(user.clone()).await?;
    }

    Ok(Json(bearer_response(&state, &user)?))
}

fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
