use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodscape_api::config::{AudioBackendKind, Config};
use moodscape_api::repositories::{RecordStore, SceneryRepository};
use moodscape_api::routes::{ChatState, HealthState};
use moodscape_api::services::{
    AudioBackend, AuthConfig, AuthService, DisabledAudioBackend, HealthService,
    PollingAudioBackend, SceneryPipeline, StreamingAudioBackend, SupabaseBucket,
};
use moodscape_api::{build_cors_layer, build_router};
use moodscape_audio_client::{StreamingAudioClient, SunoClient};
use moodscape_openai_client::OpenAiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodscape_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Starting Moodscape API server on port {}", config.port);

    if !config.openai().has_api_key() {
        tracing::warn!("OPENAI_API_KEY not set, generation requests will be rejected upstream");
    }

    let pool = if config.persist_records {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(config.database().max_connections)
            .min_connections(config.database().min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database().connect_timeout_secs,
            ))
            .connect(&config.database().url)
            .await
            .context("Failed to connect to database")?;
        tracing::info!("Database connection established");

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations completed successfully");
        Some(pool)
    } else {
        tracing::warn!("SCENERY_PERSIST=false, records will be returned but not saved");
        None
    };

    let shutdown = CancellationToken::new();

    let generator = Arc::new(OpenAiClient::new(config.openai())?);
    let images = Arc::new(SupabaseBucket::images(config.storage())?);

    let suno = match config.audio_backend {
        AudioBackendKind::Suno => Some(SunoClient::new(config.suno())?),
        _ => None,
    };

    let audio: Arc<dyn AudioBackend> = match config.audio_backend {
        AudioBackendKind::Suno => {
            let client = suno
                .clone()
                .context("music provider client not initialised")?;
            Arc::new(
                PollingAudioBackend::new(Arc::new(client), config.poll.policy())
                    .lenient(config.poll.lenient)
                    .with_shutdown(shutdown.clone()),
            )
        }
        AudioBackendKind::Stream => {
            let stream_config = config
                .audio_stream()
                .context("AUDIO_BACKEND=stream requires the audio stream configuration")?;
            Arc::new(StreamingAudioBackend::new(
                Arc::new(StreamingAudioClient::new(stream_config)?),
                Arc::new(SupabaseBucket::audio(config.storage())?),
            ))
        }
        AudioBackendKind::Disabled => Arc::new(DisabledAudioBackend),
    };

    let records = pool
        .clone()
        .map(|pool| Arc::new(SceneryRepository::new(pool)) as Arc<dyn RecordStore>);

    let pipeline = SceneryPipeline::new(generator, images, audio, records);
    tracing::info!(
        audio_backend = pipeline.audio_backend(),
        persist_records = pipeline.persists_records(),
        "Scenery pipeline ready"
    );
    let auth_service = AuthService::new(AuthConfig::new(config.jwt_secret.clone()));
    let health_state = HealthState::new(HealthService::new(pool, suno));

    let app = build_router(
        ChatState::new(pipeline),
        health_state,
        auth_service,
        build_cors_layer(&config),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Moodscape API stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM and cancels in-flight audio polls
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => tracing::warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
    shutdown.cancel();
}
