use crate::auth::gateway::AuthError;
use crate::types::{AppError, Principal};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

/// Resolves a [`Principal`] for the request and injects it into the request
/// extensions. The identity-store lookup is handed to the gateway as its
/// single collaborator call.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let store = state.store.clone();
    let principal = state
        .gateway
        .authenticate(auth_header, move |id| async move { store.get(id).await })
        .await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Extractor for the authenticated principal placed by [`auth_middleware`].
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or(AppError::Auth(AuthError::MissingCredentials))
    }
}
