//! Voice catalog types and the per-flight voice registry.

mod registry;

pub use registry::{
    VoiceRegistry, VoiceSelection, PITCH_RANGE, RATE_RANGE, SELF_PITCH, SELF_RATE, SELF_VOLUME,
    VOLUME_RANGE,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Opaque reference to one voice of the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceHandle {
    /// Identifier the engine is given to select this voice
    pub id: String,
    pub name: String,
    pub language: String,
}

impl VoiceHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
        }
    }
}

/// Voice settings used for every utterance of one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// `None` until the catalog has loaded
    pub voice: Option<VoiceHandle>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl VoiceProfile {
    pub fn is_resolved(&self) -> bool {
        self.voice.is_some()
    }
}

/// Voices the speech engine currently offers.
///
/// The snapshot may be empty while the engine is still starting up;
/// subscribers are told whenever it changes.
pub trait VoiceCatalog: Send + Sync {
    fn voices(&self) -> Vec<VoiceHandle>;

    /// Receiver whose value changes every time the catalog does.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Catalog held in memory and replaced wholesale.
pub struct InMemoryCatalog {
    voices: RwLock<Vec<VoiceHandle>>,
    changed: watch::Sender<u64>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::with_voices(Vec::new())
    }

    pub fn with_voices(voices: Vec<VoiceHandle>) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            voices: RwLock::new(voices),
            changed,
        }
    }

    /// Swap in a new voice list and notify subscribers.
    pub fn replace(&self, voices: Vec<VoiceHandle>) {
        *self.voices.write() = voices;
        self.changed.send_modify(|generation| *generation += 1);
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCatalog for InMemoryCatalog {
    fn voices(&self) -> Vec<VoiceHandle> {
        self.voices.read().clone()
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }
}
