// ATC Speech Core Library
// Phonetic transcoding and per-flight voice assignment for ATC status traffic

pub mod classify;
pub mod extract;
pub mod feed;
pub mod flight;
pub mod orchestrator;
pub mod phonetic;
pub mod speech;
pub mod transcode;
pub mod utils;
pub mod voice;

// Export core types
pub use classify::{MessageCategory, MessageClassifier};
pub use feed::{FileWatchFeed, LineFeed};
pub use flight::FlightId;
pub use orchestrator::{LineOutcome, Orchestrator, OrchestratorStats};
pub use speech::{SpeechCompletion, SpeechDispatcher, SpeechEngine, SpeechRequest};
pub use transcode::{transcode, PAUSE_MARKER};
pub use voice::{
    InMemoryCatalog, VoiceCatalog, VoiceHandle, VoiceProfile, VoiceRegistry, VoiceSelection,
};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Malformed line: {0}")]
    MalformedLine(String),

    #[error("Unsupported character: {0:?}")]
    UnsupportedCharacter(char),

    #[error("Unrecognized runway designator character: {0:?}")]
    RunwayDesignator(char),

    #[error("No token after {keyword:?} in {text:?}")]
    MissingSegment { keyword: String, text: String },

    #[error("Voice unresolved")]
    VoiceUnresolved,

    #[error("Speech engine error: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// True for failures caused by the text of a single line.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            SpeechError::MalformedLine(_)
                | SpeechError::UnsupportedCharacter(_)
                | SpeechError::RunwayDesignator(_)
                | SpeechError::MissingSegment { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SpeechError>;
