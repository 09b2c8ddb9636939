//! espeak-ng backed voice catalog and speech engine
//!
//! The catalog lists the voices of one language (`espeak-ng --voices=<lang>`)
//! and loads in the background, so it starts out empty like a browser voice
//! list. The engine plays one utterance at a time, in submission order.
//!
//! Profile values map onto espeak-ng flags:
//! - rate:   multiplier of `base_wpm` (`-s`, clamped to 80–450 wpm)
//! - pitch:  1.0 is espeak's default 50 (`-p`, 0–99)
//! - volume: 1.0 is espeak's default 100 (`-a`, 0–200)
//!
//! Env overrides:
//! - ESPEAK_BIN, ESPEAK_LANGUAGE, ESPEAK_BASE_WPM
//! - TTS_PLAYER (aplay|paplay|ffplay): render a WAV and play it with this player
//! - TTS_TEMP_DIR

use crate::utils::{get_from_env_or_path, get_from_path};
use async_trait::async_trait;
use atc_speech_core::utils::now_ms;
use atc_speech_core::{
    InMemoryCatalog, Result, SpeechEngine, SpeechError, SpeechRequest, VoiceCatalog, VoiceHandle,
};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

const MIN_WPM: f32 = 80.0;
const MAX_WPM: f32 = 450.0;

#[derive(Clone, Debug)]
pub struct EspeakConfig {
    pub espeak_bin: Option<PathBuf>,
    /// Language the catalog is restricted to
    pub language: String,
    /// Words per minute at rate 1.0
    pub base_wpm: u32,
    /// Player for rendered WAV files; espeak-ng plays directly when unset
    pub player: Option<String>,
    pub temp_dir: PathBuf,
}

impl Default for EspeakConfig {
    fn default() -> Self {
        let espeak_bin =
            get_from_env_or_path("ESPEAK_BIN", "espeak-ng").or_else(|| get_from_path("espeak"));
        let language = std::env::var("ESPEAK_LANGUAGE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "en".to_string());
        let base_wpm = std::env::var("ESPEAK_BASE_WPM")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(175);
        let player = std::env::var("TTS_PLAYER").ok().filter(|s| !s.is_empty());
        let temp_dir = std::env::var("TTS_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Self {
            espeak_bin,
            language,
            base_wpm,
            player,
            temp_dir,
        }
    }
}

/// Voice list of the installed espeak-ng.
pub struct EspeakCatalog {
    cfg: EspeakConfig,
    inner: InMemoryCatalog,
}

impl EspeakCatalog {
    pub fn new(cfg: EspeakConfig) -> Self {
        Self {
            cfg,
            inner: InMemoryCatalog::new(),
        }
    }

    /// Query espeak-ng for its voices and publish them. Returns the voice count.
    pub async fn refresh(&self) -> Result<usize> {
        let espeak = self
            .cfg
            .espeak_bin
            .as_ref()
            .ok_or_else(|| SpeechError::Engine("espeak-ng not found".into()))?;

        let output = Command::new(espeak)
            .arg(format!("--voices={}", self.cfg.language))
            .stdin(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(SpeechError::Engine(format!(
                "espeak-ng --voices failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let voices = parse_voice_table(&String::from_utf8_lossy(&output.stdout));
        let count = voices.len();
        info!(target: "espeak", language = %self.cfg.language, count, "Loaded espeak-ng voices");
        self.inner.replace(voices);
        Ok(count)
    }
}

impl VoiceCatalog for EspeakCatalog {
    fn voices(&self) -> Vec<VoiceHandle> {
        self.inner.voices()
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.subscribe()
    }
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-us           --/M      English_(America)  gmw/en-US            (en 10)
/// ```
pub fn parse_voice_table(output: &str) -> Vec<VoiceHandle> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 4 {
                return None;
            }
            let language = cols[1];
            let name = cols[3].replace('_', " ");
            Some(VoiceHandle::new(language, name, language))
        })
        .collect()
}

/// espeak-ng arguments for one request; `-w` renders to `out_wav` instead of playing.
pub fn espeak_args(request: &SpeechRequest, base_wpm: u32, out_wav: Option<&Path>) -> Vec<String> {
    let wpm = (base_wpm as f32 * request.rate)
        .round()
        .clamp(MIN_WPM, MAX_WPM) as i32;
    let pitch = (request.pitch * 50.0).round().clamp(0.0, 99.0) as i32;
    let amplitude = (request.volume * 100.0).round().clamp(0.0, 200.0) as i32;

    let mut args = vec![
        "-v".to_string(),
        request.voice.id.clone(),
        "-s".to_string(),
        wpm.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        "-a".to_string(),
        amplitude.to_string(),
    ];
    if let Some(path) = out_wav {
        args.push("-w".to_string());
        args.push(path.to_string_lossy().to_string());
    }
    args.push(request.text.clone());
    args
}

/// Speech engine running one espeak-ng process per utterance.
pub struct EspeakEngine {
    cfg: EspeakConfig,
    player: Option<PathBuf>,
    // Held for the whole utterance; tokio's Mutex hands it out first come, first served
    queue: Mutex<()>,
    cancel: watch::Sender<u64>,
}

impl EspeakEngine {
    pub fn new(cfg: EspeakConfig) -> Self {
        if let Some(ref e) = cfg.espeak_bin {
            info!(target: "espeak", bin = ?e, "Detected espeak-ng binary");
        }
        let player = cfg.player.as_deref().and_then(|name| {
            let found = get_from_path(name);
            if found.is_none() {
                warn!(target: "espeak", player = %name, "Audio player not found; espeak-ng will play directly");
            }
            found
        });
        let (cancel, _) = watch::channel(0);

        Self {
            cfg,
            player,
            queue: Mutex::new(()),
            cancel,
        }
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    async fn submit(&self, request: SpeechRequest) -> Result<()> {
        let mut cancel = self.cancel.subscribe();

        let _turn = tokio::select! {
            turn = self.queue.lock() => turn,
            _ = cancel.changed() => {
                debug!(target: "espeak", id = %request.id, "Cancelled while queued");
                return Ok(());
            }
        };
        // Turn and cancellation may arrive together
        if cancel.has_changed().unwrap_or(false) {
            debug!(target: "espeak", id = %request.id, "Cancelled while queued");
            return Ok(());
        }

        let espeak = self
            .cfg
            .espeak_bin
            .as_ref()
            .ok_or_else(|| SpeechError::Engine("espeak-ng not found".into()))?;
        let t0 = now_ms();

        match &self.player {
            Some(player) => {
                let wav_path = self.cfg.temp_dir.join(format!("atc_speech_{}.wav", request.id));
                let mut synth = Command::new(espeak);
                synth.args(espeak_args(&request, self.cfg.base_wpm, Some(&wav_path)));

                if run_until_cancelled(synth, &mut cancel).await? {
                    run_until_cancelled(player_command(player, &wav_path), &mut cancel).await?;
                }
                if let Err(e) = tokio::fs::remove_file(&wav_path).await {
                    debug!(target: "espeak", path = ?wav_path, error = %e, "Could not remove WAV");
                }
            }
            None => {
                let mut speak = Command::new(espeak);
                speak.args(espeak_args(&request, self.cfg.base_wpm, None));
                run_until_cancelled(speak, &mut cancel).await?;
            }
        }

        debug!(target: "espeak", id = %request.id, total_ms = now_ms() - t0, "Utterance done");
        Ok(())
    }

    fn cancel_all(&self) {
        self.cancel.send_modify(|generation| *generation += 1);
    }
}

/// Run `cmd` to completion. Returns `false` if it was killed by a cancellation.
async fn run_until_cancelled(mut cmd: Command, cancel: &mut watch::Receiver<u64>) -> Result<bool> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    debug!(target: "espeak", command = ?cmd, "Running");

    let program = cmd.as_std().get_program().to_string_lossy().to_string();
    let mut child = cmd.spawn()?;
    // Drained while the child runs
    let stderr = child.stderr.take().map(|mut pipe| {
        tokio::spawn(async move {
            let mut message = String::new();
            let _ = pipe.read_to_string(&mut message).await;
            message
        })
    });

    tokio::select! {
        status = child.wait() => {
            let status = status?;
            if status.success() {
                if let Some(reader) = stderr {
                    reader.abort();
                }
                return Ok(true);
            }
            let message = match stderr {
                Some(reader) => reader.await.unwrap_or_default(),
                None => String::new(),
            };
            Err(SpeechError::Engine(format!(
                "{} exited with {}: {}",
                program,
                status,
                message.trim()
            )))
        }
        _ = cancel.changed() => {
            debug!(target: "espeak", program = %program, "Killing on cancel");
            if let Some(reader) = stderr {
                reader.abort();
            }
            child.kill().await?;
            Ok(false)
        }
    }
}

fn player_command(player: &Path, wav_path: &Path) -> Command {
    let name = player.file_name().and_then(|s| s.to_str()).unwrap_or("");
    let mut cmd = Command::new(player);
    if name == "ffplay" {
        cmd.args(["-autoexit", "-nodisp", "-loglevel", "quiet"]);
    }
    cmd.arg(wav_path);
    cmd
}
