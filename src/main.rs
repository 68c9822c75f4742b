use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::net::SocketAddr;

use storefront_api::{
    config::{AppConfig, StoreBackend},
    db::{create_pool, run_migrations},
    middleware::session::create_session_layer,
    routes::build_app,
    state::AppState,
    store::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let app = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(config.require_database_url()?).await?;
            run_migrations(&pool).await?;

            let session_store = PostgresStore::new(pool.clone());
            session_store.migrate().await?;

            build_app(
                AppState::postgres(PgStore::new(pool)),
                create_session_layer(session_store, &config),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; all data is lost on exit");
            build_app(
                AppState::in_memory(),
                create_session_layer(MemoryStore::default(), &config),
            )
        }
    };

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!(backend = ?config.store_backend, "listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
