mod asr;
mod audio;
mod config_manager;
mod error;
mod handlers;
mod routes;
mod speech_service;
mod state;
mod translate;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config_manager::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recording_translator=debug,tower_http=debug")),
        )
        .init();

    let config = load_config()?;

    let static_dir = config.system_config.static_path();
    if !static_dir.join("index.html").exists() {
        tracing::warn!("No index.html in {:?}, only the JSON API will be useful", static_dir);
    }

    let addr = config.system_config.socket_addr();
    let app_state = AppState::new(config)?;
    let app = routes::build_app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// First readable file among `CONFIG_PATH` and the usual locations; defaults
/// when none exists.
fn load_config() -> Result<Config> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let explicit = std::env::var("CONFIG_PATH").ok();
    if let Some(path) = &explicit {
        // An explicitly named file must load
        let config = Config::load(path)?;
        info!("Loaded configuration from: {}", path);
        return Ok(config);
    }

    let config_paths: Vec<String> = vec![
        Some("conf.yaml".to_string()),
        Some("conf.jsonld".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
        exe_dir.join("conf.jsonld").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        if !std::path::Path::new(path).exists() {
            continue;
        }
        let config = Config::load(path)?;
        info!("Loaded configuration from: {}", path);
        return Ok(config);
    }

    info!("No config file found (tried {:?}), using defaults", config_paths);
    Ok(Config::default())
}
