use aegis::{
    api::routes::create_router,
    types::{Role, User},
    AppState, Config, MemoryStore, UserStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aegis=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
    let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store);

    seed_admin(&state).await?;

    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "aegis-server listening");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

/// Ensures a bootstrap admin account exists so the admin-only operations are
/// reachable on a fresh store.
async fn seed_admin(state: &AppState) -> anyhow::Result<()> {
    let auth = &state.config.auth;

    if state.store.get_by_email(&auth.admin_email).await.is_some() {
        return Ok(());
    }

    let password_hash = state.hasher.hash(&auth.admin_password)?;
    let admin = User::new(auth.admin_email.clone(), "admin", password_hash, Role::Admin);
    state.store.create(admin).await?;

    tracing::info!(email = %auth.admin_email, "seeded bootstrap admin account");
    Ok(())
}
