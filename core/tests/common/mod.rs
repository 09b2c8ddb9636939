//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use atc_speech_core::{Result, SpeechEngine, SpeechRequest, VoiceHandle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Engine that records every request and finishes immediately
#[derive(Default)]
pub struct RecordingEngine {
    requests: Mutex<Vec<SpeechRequest>>,
    cancels: AtomicUsize,
}

impl RecordingEngine {
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechEngine for RecordingEngine {
    async fn submit(&self, request: SpeechRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }

    fn cancel_all(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn voice(id: &str) -> VoiceHandle {
    VoiceHandle::new(id, format!("Voice {}", id), "en")
}

pub fn voices(ids: &[&str]) -> Vec<VoiceHandle> {
    ids.iter().map(|id| voice(id)).collect()
}
