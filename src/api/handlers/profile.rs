//! Professional-status upgrade flow.
//!
//! A two-step, time-limited token exchange: requesting an upgrade persists
//! the digest of a fresh random token against the account; confirming
//! presents the token, which is checked against the stored digest and
//! expiry, consumed, and traded for the PROFESSIONAL role. Delivery of the
//! token (mail, support desk) is an external collaborator's concern.

use crate::{
    auth::access::AccessRule,
    auth::middleware::AuthUser,
    db::UpgradeToken,
    types::{
        AccountStatus, AppError, MessageResponse, Result, Role, UpgradeConfirmRequest,
        UpgradeTokenResponse,
    },
    AppState,
};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

static UPGRADE_PROFILE: AccessRule =
    AccessRule::roles(&[Role::Admin, Role::User, Role::Professional]);

/// Tokens are stored digested; a leaked store copy is useless on its own.
fn digest_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Request an upgrade to professional status
#[utoipa::path(
    post,
    path = "/profile/upgrade",
    responses(
        (status = 200, description = "Upgrade token issued", body = UpgradeTokenResponse),
        (status = 400, description = "Already a professional")
    ),
    tag = "profile"
)]
pub async fn request_upgrade(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<UpgradeTokenResponse>> {
    state
        .gateway
        .authorize(&principal, &UPGRADE_PROFILE, Some(principal.id))?;

    let user = state
        .store
        .get(principal.id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.role == Role::Professional {
        return Err(AppError::InvalidInput(
            "User is already a professional.".to_string(),
        ));
    }

    let token = generate_token();
    let expires_at = Utc::now() + Duration::hours(state.config.auth.upgrade_token_ttl_hours);

    state
        .store
        .put_upgrade_token(
            user.id,
            UpgradeToken {
                digest: digest_token(&token),
                expires_at,
            },
        )
        .await;

    tracing::info!(user_id = %user.id, "profile upgrade requested");

    Ok(Json(UpgradeTokenResponse {
        upgrade_token: token,
        expires_at,
    }))
}

/// Confirm a pending upgrade with the issued token
#[utoipa::path(
    post,
    path = "/profile/upgrade/confirm",
    request_body = UpgradeConfirmRequest,
    responses(
        (status = 200, description = "Profile upgraded", body = MessageResponse),
        (status = 400, description = "Missing, expired or mismatched token")
    ),
    tag = "profile"
)]
pub async fn confirm_upgrade(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<UpgradeConfirmRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .gateway
        .authorize(&principal, &UPGRADE_PROFILE, Some(principal.id))?;

    let invalid = || AppError::InvalidInput("Invalid or expired upgrade token.".to_string());

    let pending = state
        .store
        .get_upgrade_token(principal.id)
        .await
        .ok_or_else(invalid)?;

    if pending.expires_at < Utc::now() {
        state.store.remove_upgrade_token(principal.id).await;
        return Err(invalid());
    }

    if pending.digest != digest_token(&payload.token) {
        return Err(invalid());
    }

    // Single use: consumed before the promotion lands.
    state.store.remove_upgrade_token(principal.id).await;

    let mut user = state
        .store
        .get(principal.id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    user.role = Role::Professional;
    user.status = AccountStatus::Professional;
    user.updated_at = Utc::now();
    state.store.update(user).await?;

    tracing::info!(user_id = %principal.id, "profile upgraded to professional");

    Ok(Json(MessageResponse {
        message: "Profile upgraded to professional status.".to_string(),
    }))
}
