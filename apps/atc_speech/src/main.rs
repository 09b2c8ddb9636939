mod config;
use atc_audio::{fallback_catalog, EspeakCatalog, EspeakEngine, LogOnlyEngine};
use atc_speech_core::{
    FileWatchFeed, LineFeed, Orchestrator, SpeechDispatcher, SpeechEngine, VoiceCatalog,
    VoiceRegistry,
};
use config::AtcSpeechConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        "info,atc_speech_core=info,atc_audio=info,atc_speech=info".to_string()
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(target: "atc_speech", "Starting up ATC speech");

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = AtcSpeechConfig::load();

    // 1) Voice catalog + speech engine; espeak-ng when installed, log-only otherwise
    let (catalog, engine): (Arc<dyn VoiceCatalog>, Arc<dyn SpeechEngine>) =
        if cfg.espeak.espeak_bin.is_some() {
            let espeak_catalog = Arc::new(EspeakCatalog::new(cfg.espeak.clone()));
            // The voice list arrives a moment after startup; the registry catches up on change
            let loader = Arc::clone(&espeak_catalog);
            tokio::spawn(async move {
                if let Err(e) = loader.refresh().await {
                    warn!(target: "atc_speech", error = %e, "Failed to load espeak-ng voices");
                }
            });
            let catalog: Arc<dyn VoiceCatalog> = espeak_catalog;
            let engine: Arc<dyn SpeechEngine> = Arc::new(EspeakEngine::new(cfg.espeak.clone()));
            (catalog, engine)
        } else {
            warn!(
                target: "atc_speech",
                "No speech engine detected (espeak-ng missing). Printing only."
            );
            let catalog: Arc<dyn VoiceCatalog> = Arc::new(fallback_catalog());
            let engine: Arc<dyn SpeechEngine> = Arc::new(LogOnlyEngine);
            (catalog, engine)
        };

    // 2) Voice registry + dispatcher + classifier → orchestrator
    let mut registry =
        VoiceRegistry::new(Arc::clone(&catalog)).with_selection(cfg.voices.selection);
    if let Some(seed) = cfg.voices.seed {
        registry = registry.with_seed(seed);
    }
    let dispatcher = SpeechDispatcher::new(engine, Arc::clone(&catalog));
    let stopper = dispatcher.clone();
    let orchestrator = Orchestrator::new(cfg.build_classifier(), registry, dispatcher, catalog);

    // 3) Status feed → orchestrator
    let (tx, rx) = mpsc::channel::<String>(64);
    let feed_handle = match &cfg.feed.file {
        Some(path) => {
            FileWatchFeed::new(path.clone(), Duration::from_millis(cfg.feed.poll_ms)).start(tx)
        }
        None => {
            info!(target: "atc_speech", "Reading status lines from stdin");
            LineFeed::new(BufReader::new(tokio::io::stdin())).start(tx)
        }
    };
    let mut orchestrator_handle = tokio::spawn(orchestrator.run(rx));

    // Ctrl+C handler to shutdown gracefully
    tokio::select! {
        res = signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(target: "atc_speech", error = %e, "Failed to listen for Ctrl+C");
            }
            info!(target: "atc_speech", "Shutting down...");
            stopper.stop_all();
            feed_handle.abort();
            orchestrator_handle.abort();
        }
        stats = &mut orchestrator_handle => {
            match stats {
                Ok(stats) => info!(target: "atc_speech", ?stats, "Status feed ended"),
                Err(e) => warn!(target: "atc_speech", error = %e, "Orchestrator task failed"),
            }
        }
    }

    Ok(())
}
