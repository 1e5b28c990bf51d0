use std::sync::Arc;

use anyhow::{Context, Result};
use clinicavet_app::{
    app::build_router,
    config::{AppConfig, StorageKind},
    state::AppState,
};
use clinicavet_application::{PetRepository, PetService};
use clinicavet_infrastructure::{InMemoryPetRepository, PostgresPetRepository, db};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let repository: Arc<dyn PetRepository> = match config.storage {
        StorageKind::Postgres => {
            let pool = db::connect(&config.database_url, config.db_max_connections)
                .await
                .context("failed to connect to postgres")?;
            if config.run_migrations {
                db::run_migrations(&pool)
                    .await
                    .context("failed to run database migrations")?;
            }
            Arc::new(PostgresPetRepository::new(pool))
        }
        StorageKind::Memory => {
            warn!("using in-memory storage, records are lost on shutdown");
            Arc::new(InMemoryPetRepository::new())
        }
    };

    let credentials = config
        .auth
        .clone()
        .into_verifier(bcrypt::DEFAULT_COST)
        .context("failed to prepare API credentials")?;

    let state = AppState::new(
        Arc::new(PetService::new(repository)),
        Arc::new(credentials),
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        bind_addr = %config.bind_addr,
        storage = ?config.storage,
        username = %config.auth.username,
        "clinicavet API started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("clinicavet_app=debug,clinicavet_application=info,tower_http=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install sigterm handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
