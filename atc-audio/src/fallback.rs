//! Degraded mode for machines without a speech synthesizer.
//!
//! Utterances are logged instead of spoken and finish immediately, so the rest
//! of the pipeline (classification, transcoding, voice assignment) still runs.

use async_trait::async_trait;
use atc_speech_core::{InMemoryCatalog, Result, SpeechEngine, SpeechRequest, VoiceHandle};
use tracing::{debug, info};

pub struct LogOnlyEngine;

#[async_trait]
impl SpeechEngine for LogOnlyEngine {
    async fn submit(&self, request: SpeechRequest) -> Result<()> {
        info!(
            target: "tts",
            id = %request.id,
            voice = %request.voice.id,
            rate = request.rate,
            pitch = request.pitch,
            volume = request.volume,
            "{}",
            request.text
        );
        Ok(())
    }

    fn cancel_all(&self) {
        debug!(target: "tts", "Nothing to cancel in log-only mode");
    }
}

/// Single-voice catalog so profiles resolve without a real engine.
pub fn fallback_catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_voices(vec![VoiceHandle::new("default", "Log only", "en")])
}
