//! Speech dispatch: one voice profile plus one utterance in, playback out.
//!
//! The dispatcher only validates and submits. Queuing of overlapping
//! utterances is up to the [`SpeechEngine`]; every call to
//! [`SpeechDispatcher::speak`] runs independently and resolves on its own.

use crate::utils::gen_id;
use crate::voice::{VoiceCatalog, VoiceHandle, VoiceProfile};
use crate::{Result, SpeechError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Everything the engine needs to voice one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub id: String,
    pub text: String,
    pub voice: VoiceHandle,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Speech synthesis backend.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speak `request`; resolves when the utterance has ended.
    async fn submit(&self, request: SpeechRequest) -> Result<()>;

    /// Stop everything that is playing or queued.
    fn cancel_all(&self);
}

/// Pending end-of-utterance signal returned by [`SpeechDispatcher::speak`].
///
/// Awaiting it is optional; dropping it lets the utterance finish unobserved.
#[derive(Debug)]
pub struct SpeechCompletion {
    id: String,
    handle: JoinHandle<Result<()>>,
}

impl SpeechCompletion {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for SpeechCompletion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(SpeechError::Engine(format!("speech task failed: {}", e))),
        })
    }
}

#[derive(Clone)]
pub struct SpeechDispatcher {
    engine: Arc<dyn SpeechEngine>,
    catalog: Arc<dyn VoiceCatalog>,
}

impl SpeechDispatcher {
    pub fn new(engine: Arc<dyn SpeechEngine>, catalog: Arc<dyn VoiceCatalog>) -> Self {
        Self { engine, catalog }
    }

    /// Submit `text` in the given voice. Must be called inside a tokio runtime.
    ///
    /// An empty catalog is only warned about; a profile without a voice fails.
    pub fn speak(&self, profile: &VoiceProfile, text: &str) -> Result<SpeechCompletion> {
        debug!(target: "speech", text = %text, ?profile, "speak");

        if self.catalog.voices().is_empty() {
            warn!(target: "speech", "Cannot speak without any voices");
        }

        let voice = profile.voice.clone().ok_or(SpeechError::VoiceUnresolved)?;
        let request = SpeechRequest {
            id: gen_id(),
            text: text.to_string(),
            voice,
            rate: profile.rate,
            pitch: profile.pitch,
            volume: profile.volume,
        };

        let id = request.id.clone();
        let engine = Arc::clone(&self.engine);
        let handle = tokio::spawn(async move {
            let id = request.id.clone();
            let result = engine.submit(request).await;
            match &result {
                Ok(()) => debug!(target: "speech", id = %id, "Utterance ended"),
                Err(e) => warn!(target: "speech", id = %id, error = %e, "Utterance failed"),
            }
            result
        });

        Ok(SpeechCompletion { id, handle })
    }

    /// Silence all speech, queued or playing.
    pub fn stop_all(&self) {
        debug!(target: "speech", "Stopping all speech");
        self.engine.cancel_all();
    }
}
