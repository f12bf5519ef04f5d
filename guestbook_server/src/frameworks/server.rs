// Framework bootstrap for the guestbook service.

use crate::domain::entities::GuestbookKey;
use crate::domain::ports::{GreetingStore, IdentityProvider};
use crate::frameworks::config::ServerConfig;
use crate::frameworks::db;
use crate::interface_adapters::clients::{AnonymousIdentity, AuthServiceIdentity};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{
    AppState, SessionDemoSettings, SharedClock, SharedSessionStore, SystemClock,
};
use crate::interface_adapters::stores::{
    InMemoryGreetingStore, InMemorySessionStore, PostgresGreetingStore, PostgresSessionStore,
};
use crate::use_cases::sessions::{SessionManager, SessionSettings};
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: ServerConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&config).await?;

    // Start the web server with the HTTP routes wired up.
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = ServerConfig::load().map_err(|e| {
        tracing::error!(error = %e, "failed to load config");
        std::io::Error::other(e.to_string())
    })?;

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, config).await
}

async fn build_state(config: &ServerConfig) -> Result<Arc<AppState>> {
    let clock: SharedClock = Arc::new(SystemClock);

    let (greetings, session_store): (Arc<dyn GreetingStore>, SharedSessionStore) =
        match &config.database_url {
            Some(database_url) => {
                let db = db::connect_pool(database_url).await.map_err(|e| {
                    tracing::error!(error = %e, "failed to connect to database");
                    std::io::Error::other(e.to_string())
                })?;
                db::run_migrations(&db).await.map_err(|e| {
                    tracing::error!(error = %e, "failed to run migrations");
                    std::io::Error::other(e.to_string())
                })?;
                tracing::info!("using postgres stores");
                let greetings: Arc<dyn GreetingStore> =
                    Arc::new(PostgresGreetingStore { db: db.clone() });
                let session_store: SharedSessionStore = Arc::new(PostgresSessionStore { db });
                (greetings, session_store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; greetings and sessions are kept in memory");
                let greetings: Arc<dyn GreetingStore> = Arc::new(InMemoryGreetingStore::default());
                let session_store: SharedSessionStore = Arc::new(InMemorySessionStore::default());
                (greetings, session_store)
            }
        };

    let identity: Arc<dyn IdentityProvider> = match &config.auth_service_url {
        Some(auth_base_url) => {
            let client = AuthServiceIdentity::new(auth_base_url.clone(), config.auth_timeout())
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to initialize auth client");
                    std::io::Error::other(format!("failed to initialize auth client: {e}"))
                })?;
            tracing::debug!(
                auth_base_url = %auth_base_url,
                auth_timeout_ms = config.auth_timeout_ms,
                "auth client configured"
            );
            Arc::new(client)
        }
        None => {
            tracing::info!("AUTH_SERVICE_URL not set; all visitors sign anonymously");
            Arc::new(AnonymousIdentity)
        }
    };

    let sessions = SessionManager {
        clock: clock.clone(),
        store: session_store.clone(),
        settings: SessionSettings {
            namespace: config.session_namespace.clone(),
            default_duration_secs: config.session_default_duration_secs,
            default_max_age_secs: config.session_default_max_age_secs,
        },
    };

    Ok(Arc::new(AppState {
        greetings,
        identity,
        clock,
        session_store,
        sessions,
        guestbook: GuestbookKey::default(),
        session_demo: SessionDemoSettings {
            max_age_override: config.session_demo_max_age,
            save_failure: config.session_save_failure,
        },
    }))
}
