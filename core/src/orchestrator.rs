//! Per-line pipeline: classify, transcode, pick a voice, speak.
//!
//! The orchestrator owns the voice registry and is driven from a single task,
//! so the registry needs no locking.

use crate::classify::{MessageCategory, MessageClassifier};
use crate::flight::FlightId;
use crate::speech::{SpeechCompletion, SpeechDispatcher};
use crate::transcode::transcode;
use crate::voice::{VoiceCatalog, VoiceRegistry};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What became of one status line.
#[derive(Debug)]
pub enum LineOutcome {
    Ignored,
    Spoken {
        category: MessageCategory,
        /// Set for third-party traffic only
        flight: Option<FlightId>,
        utterance: String,
        completion: SpeechCompletion,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorStats {
    pub lines: u64,
    pub ignored: u64,
    pub spoken_self: u64,
    pub spoken_traffic: u64,
    pub failed: u64,
    pub voices_fixed: u64,
}

pub struct Orchestrator {
    classifier: MessageClassifier,
    registry: VoiceRegistry,
    dispatcher: SpeechDispatcher,
    catalog: Arc<dyn VoiceCatalog>,
    stats: OrchestratorStats,
}

impl Orchestrator {
    pub fn new(
        classifier: MessageClassifier,
        registry: VoiceRegistry,
        dispatcher: SpeechDispatcher,
        catalog: Arc<dyn VoiceCatalog>,
    ) -> Self {
        Self {
            classifier,
            registry,
            dispatcher,
            catalog,
            stats: OrchestratorStats::default(),
        }
    }

    pub fn registry(&self) -> &VoiceRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &OrchestratorStats {
        &self.stats
    }

    /// Handle one full status text. Must be called inside a tokio runtime.
    pub fn on_status_text(&mut self, text: &str) -> Result<LineOutcome> {
        debug!(target: "orchestrator", text = %text, "New status text");
        self.stats.lines += 1;

        let outcome = self.route(text);
        match &outcome {
            Ok(LineOutcome::Ignored) => self.stats.ignored += 1,
            Ok(LineOutcome::Spoken { category, .. }) => match category {
                MessageCategory::SelfOriginated => self.stats.spoken_self += 1,
                _ => self.stats.spoken_traffic += 1,
            },
            Err(_) => self.stats.failed += 1,
        }
        outcome
    }

    /// Attach voices to profiles created before the catalog was ready.
    pub fn on_catalog_changed(&mut self) -> usize {
        let fixed = self.registry.reconcile();
        self.stats.voices_fixed += fixed as u64;
        fixed
    }

    /// Drive the pipeline until the feed closes, then let queued speech finish.
    ///
    /// Failures of individual lines are logged and never stop the loop.
    pub async fn run(mut self, mut feed: mpsc::Receiver<String>) -> OrchestratorStats {
        let mut catalog_rx = self.catalog.subscribe();
        let mut catalog_open = true;
        let mut pending: Vec<SpeechCompletion> = Vec::new();
        info!(target: "orchestrator", "Listening for status text");

        loop {
            tokio::select! {
                // Catalog changes first, so a line never meets a stale registry
                biased;

                changed = catalog_rx.changed(), if catalog_open => {
                    if changed.is_err() {
                        debug!(target: "orchestrator", "Voice catalog closed");
                        catalog_open = false;
                        continue;
                    }
                    let voices = self.catalog.voices().len();
                    info!(target: "orchestrator", voices, "Voice catalog changed");
                    self.on_catalog_changed();
                }
                maybe_text = feed.recv() => {
                    let Some(text) = maybe_text else { break };
                    match self.on_status_text(&text) {
                        Ok(LineOutcome::Spoken { completion, .. }) => {
                            pending.retain(|c| !c.is_finished());
                            pending.push(completion);
                        }
                        Ok(LineOutcome::Ignored) => {}
                        Err(e) => {
                            warn!(target: "orchestrator", error = %e, text = %text, "Failed to handle status text");
                        }
                    }
                }
            }
        }

        info!(
            target: "orchestrator",
            pending = pending.len(),
            "Status feed closed; waiting for speech in flight"
        );
        for completion in pending {
            // Failures were already logged by the dispatcher
            let _ = completion.await;
        }
        info!(target: "orchestrator", stats = ?self.stats, "Orchestrator stopped");
        self.stats
    }

    fn route(&mut self, text: &str) -> Result<LineOutcome> {
        match self.classifier.classify(text) {
            MessageCategory::Ignorable => {
                warn!(target: "orchestrator", text = %text, "Ignoring message");
                Ok(LineOutcome::Ignored)
            }
            MessageCategory::SelfOriginated => {
                let utterance = transcode(text)?;
                let profile = self.registry.self_voice();
                let completion = self.dispatcher.speak(profile, &utterance)?;
                Ok(LineOutcome::Spoken {
                    category: MessageCategory::SelfOriginated,
                    flight: None,
                    utterance,
                    completion,
                })
            }
            MessageCategory::ThirdParty => {
                let flight = FlightId::from_status_line(text);
                let utterance = transcode(text)?;
                let profile = self.registry.get_or_create(&flight);
                let completion = self.dispatcher.speak(profile, &utterance)?;
                Ok(LineOutcome::Spoken {
                    category: MessageCategory::ThirdParty,
                    flight: Some(flight),
                    utterance,
                    completion,
                })
            }
        }
    }
}
