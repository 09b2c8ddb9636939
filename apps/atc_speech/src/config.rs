use std::fs;
use std::path::{Path, PathBuf};

use atc_audio::EspeakConfig;
use atc_speech_core::{MessageClassifier, VoiceSelection};

/// Top-level configuration for the ATC speech app
#[derive(Clone, Debug)]
pub struct AtcSpeechConfig {
    pub feed: FeedConfig,
    pub espeak: EspeakConfig,
    pub voices: VoicesConfig,
    pub classifier: ClassifierConfig,
}

/// Where status text comes from
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Status file to poll; stdin lines when unset
    pub file: Option<PathBuf>,
    pub poll_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct VoicesConfig {
    pub selection: VoiceSelection,
    /// Fixed RNG seed for reproducible voices across runs
    pub seed: Option<u64>,
}

/// Phrases added on top of the built-in lists
#[derive(Clone, Debug, Default)]
pub struct ClassifierConfig {
    pub extra_ignore_phrases: Vec<String>,
    pub extra_command_phrases: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            file: std::env::var("ATC_FEED_FILE")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            poll_ms: std::env::var("ATC_FEED_POLL_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(100),
        }
    }
}

impl Default for AtcSpeechConfig {
    fn default() -> Self {
        let voices = VoicesConfig {
            selection: std::env::var("ATC_VOICE_SELECTION")
                .ok()
                .and_then(|s| parse_selection(&s))
                .unwrap_or_default(),
            seed: std::env::var("ATC_VOICE_SEED")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
        };

        Self {
            feed: FeedConfig::default(),
            espeak: EspeakConfig::default(),
            voices,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AtcSpeechConfig {
    /// Load configuration from a TOML file (path via ATC_SPEECH_CONFIG or ./atc_speech.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("ATC_SPEECH_CONFIG").unwrap_or_else(|_| "atc_speech.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target: "atc_speech", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match Self::from_toml_str(&s, default.clone()) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(target: "atc_speech", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target: "atc_speech", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    pub fn from_toml_str(s: &str, base: Self) -> Result<Self, toml::de::Error> {
        Ok(toml::from_str::<AtcSpeechToml>(s)?.overlay(base))
    }

    pub fn build_classifier(&self) -> MessageClassifier {
        MessageClassifier::default()
            .with_ignored_phrases(&self.classifier.extra_ignore_phrases)
            .with_command_phrases(&self.classifier.extra_command_phrases)
    }
}

fn parse_selection(s: &str) -> Option<VoiceSelection> {
    match s.trim().to_lowercase().as_str() {
        "first" => Some(VoiceSelection::First),
        "random" => Some(VoiceSelection::Random),
        _ => None,
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct AtcSpeechToml {
    pub feed: Option<FeedToml>,
    pub espeak: Option<EspeakToml>,
    pub voices: Option<VoicesToml>,
    pub classifier: Option<ClassifierToml>,
}

impl AtcSpeechToml {
    fn overlay(self, mut base: AtcSpeechConfig) -> AtcSpeechConfig {
        if let Some(f) = self.feed {
            f.apply(&mut base.feed);
        }
        if let Some(e) = self.espeak {
            e.apply(&mut base.espeak);
        }
        if let Some(v) = self.voices {
            v.apply(&mut base.voices);
        }
        if let Some(c) = self.classifier {
            c.apply(&mut base.classifier);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct FeedToml {
    pub file: Option<PathBuf>,
    pub poll_ms: Option<u64>,
}
impl FeedToml {
    fn apply(self, f: &mut FeedConfig) {
        if let Some(x) = self.file {
            f.file = Some(x);
        }
        if let Some(x) = self.poll_ms {
            f.poll_ms = x.max(10);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct EspeakToml {
    pub bin: Option<PathBuf>,
    pub language: Option<String>,
    pub base_wpm: Option<u32>,
    pub player: Option<String>,
    pub temp_dir: Option<PathBuf>,
}
impl EspeakToml {
    fn apply(self, e: &mut EspeakConfig) {
        if let Some(x) = self.bin {
            e.espeak_bin = Some(x);
        }
        if let Some(x) = self.language {
            e.language = x;
        }
        if let Some(x) = self.base_wpm {
            e.base_wpm = x;
        }
        if let Some(x) = self.player {
            e.player = Some(x);
        }
        if let Some(x) = self.temp_dir {
            e.temp_dir = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct VoicesToml {
    pub selection: Option<VoiceSelection>,
    pub seed: Option<u64>,
}
impl VoicesToml {
    fn apply(self, v: &mut VoicesConfig) {
        if let Some(x) = self.selection {
            v.selection = x;
        }
        if let Some(x) = self.seed {
            v.seed = Some(x);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ClassifierToml {
    pub extra_ignore_phrases: Option<Vec<String>>,
    pub extra_command_phrases: Option<Vec<String>>,
}
impl ClassifierToml {
    fn apply(self, c: &mut ClassifierConfig) {
        if let Some(x) = self.extra_ignore_phrases {
            c.extra_ignore_phrases = x;
        }
        if let Some(x) = self.extra_command_phrases {
            c.extra_command_phrases = x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atc_speech_core::MessageCategory;

    #[test]
    fn test_overlay_keeps_unset_values() {
        let base = AtcSpeechConfig::default();
        let base_wpm = base.espeak.base_wpm;
        let cfg = AtcSpeechConfig::from_toml_str(
            r#"
            [feed]
            file = "/tmp/statusbar.txt"

            [voices]
            selection = "random"
            seed = 7
            "#,
            base,
        )
        .unwrap();

        assert_eq!(cfg.feed.file, Some(PathBuf::from("/tmp/statusbar.txt")));
        assert_eq!(cfg.voices.selection, VoiceSelection::Random);
        assert_eq!(cfg.voices.seed, Some(7));
        assert_eq!(cfg.espeak.base_wpm, base_wpm);
    }

    #[test]
    fn test_extra_phrases_reach_classifier() {
        let cfg = AtcSpeechConfig::from_toml_str(
            r#"
            [classifier]
            extra_ignore_phrases = ["Game Paused"]
            extra_command_phrases = ["go around"]
            "#,
            AtcSpeechConfig::default(),
        )
        .unwrap();
        let classifier = cfg.build_classifier();

        assert_eq!(
            classifier.classify("SYS: game paused"),
            MessageCategory::Ignorable
        );
        assert_eq!(
            classifier.classify("UAL45: go around"),
            MessageCategory::SelfOriginated
        );
    }

    #[test]
    fn test_bad_selection_is_rejected() {
        let err = AtcSpeechConfig::from_toml_str(
            "[voices]\nselection = \"loudest\"\n",
            AtcSpeechConfig::default(),
        );
        assert!(err.is_err());
        assert_eq!(parse_selection(" Random "), Some(VoiceSelection::Random));
        assert_eq!(parse_selection("loudest"), None);
    }
}
