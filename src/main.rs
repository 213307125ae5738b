use std::sync::Arc;

use voiceline::config::Settings;
use voiceline::providers::storage::FileStorage;
use voiceline::providers::telephony::provider_from_settings;
use voiceline::server::{self, AppState};
use voiceline::store::EntityStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let settings = Settings::from_env();
    let numbers = provider_from_settings(&settings);

    eprintln!("📞 Voiceline v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}:{}/api/v1", settings.host, settings.port);
    eprintln!(
        "   Uploads: {} (max {} MB, types: {})",
        settings.upload_dir.display(),
        settings.max_file_size_mb,
        settings.allowed_file_types.join(", ")
    );
    eprintln!(
        "   Telephony: {}",
        if numbers.is_configured() {
            "twilio"
        } else {
            "mock (no credentials configured)"
        }
    );

    let state = AppState {
        store: Arc::new(EntityStore::new()),
        storage: Arc::new(FileStorage::new(settings.upload_dir.clone())),
        numbers,
        settings: Arc::new(settings.clone()),
    };

    let app = server::app(state);
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.host, settings.port)).await?;
    tracing::info!(host = %settings.host, port = settings.port, "Voiceline API started");
    axum::serve(listener, app).await?;

    Ok(())
}
