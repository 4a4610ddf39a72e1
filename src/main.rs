mod ai;
mod config;
mod core;
mod error;
mod logger;
mod server;
mod services;

use std::sync::Arc;

use crate::ai::{CompletionProvider, GeminiClient, OpenAIClient};
use crate::config::{Config, ProviderKind};
use crate::core::ResponseSelector;
use crate::services::{ChatStore, SQLiteStorage};

/// Provider for the configured credential, `None` to answer from local rules only.
fn build_provider(config: &Config) -> anyhow::Result<Option<Arc<dyn CompletionProvider>>> {
    let Some(api_key) = config.provider_api_key() else {
        return Ok(None);
    };

    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::OpenAI => Arc::new(
            OpenAIClient::new(
                api_key.to_string(),
                Some(config.openai_model.clone()),
                Some(config.temperature),
                Some(config.max_tokens),
            )
            .with_base_url(config.openai_base_url.as_str())
            .with_timeout(config.provider_timeout)?,
        ),
        ProviderKind::Gemini => Arc::new(
            GeminiClient::new(
                api_key.to_string(),
                Some(config.gemini_model.clone()),
                Some(config.temperature),
                Some(config.max_tokens),
            )
            .with_base_url(config.gemini_base_url.as_str())
            .with_timeout(config.provider_timeout)?,
        ),
    };
    Ok(Some(provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();
    log::info!("🚀 HeritaGo assistant starting");

    let config = Config::default();
    log::info!("📁 Configuration loaded");

    if !config.provider_enabled() {
        log::info!("📡 No provider credential, answering from local rules");
    }
    let provider = build_provider(&config)?;
    if let Some(p) = &provider {
        log::info!("📡 Remote provider: {}", p.name());
    }

    let store: Arc<dyn ChatStore> = Arc::new(SQLiteStorage::new(Some(config.db_path.clone()))?);

    let state = Arc::new(server::AppState {
        selector: ResponseSelector::new(provider, Some(store), config.system_prompt.clone()),
        history_limit: config.history_limit,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🌐 Listening on {}", config.bind_addr);

    axum::serve(listener, server::build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("👋 Shutting down");
        })
        .await?;

    Ok(())
}
