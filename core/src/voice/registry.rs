use super::{VoiceCatalog, VoiceHandle, VoiceProfile};
use crate::flight::FlightId;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, info};

pub const RATE_RANGE: RangeInclusive<f32> = 1.0..=1.5;
pub const PITCH_RANGE: RangeInclusive<f32> = 0.25..=1.25;
pub const VOLUME_RANGE: RangeInclusive<f32> = 0.5..=1.0;

/// The operator's own voice is fast, flat and quiet so it never passes for traffic.
pub const SELF_RATE: f32 = 4.0;
pub const SELF_PITCH: f32 = 0.01;
pub const SELF_VOLUME: f32 = 0.25;

/// How a catalog voice is picked for a new flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceSelection {
    /// Always the first catalog entry; flights differ by rate, pitch and volume only
    #[default]
    First,
    /// Uniform choice over the whole catalog
    Random,
}

/// Stable mapping from flight to voice profile.
///
/// Profiles are created on first reference and live for the whole session.
/// The only later change is attaching a catalog voice to a profile that was
/// created before the catalog loaded (see [`VoiceRegistry::reconcile`]).
pub struct VoiceRegistry {
    catalog: Arc<dyn VoiceCatalog>,
    selection: VoiceSelection,
    rng: StdRng,
    voices: HashMap<FlightId, VoiceProfile>,
    self_voice: Option<VoiceProfile>,
}

impl VoiceRegistry {
    pub fn new(catalog: Arc<dyn VoiceCatalog>) -> Self {
        Self {
            catalog,
            selection: VoiceSelection::default(),
            rng: StdRng::from_entropy(),
            voices: HashMap::new(),
            self_voice: None,
        }
    }

    pub fn with_selection(mut self, selection: VoiceSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Deterministic rate/pitch/volume draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn get(&self, flight: &FlightId) -> Option<&VoiceProfile> {
        self.voices.get(flight)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn get_or_create(&mut self, flight: &FlightId) -> &VoiceProfile {
        if !self.voices.contains_key(flight) {
            let profile = self.random_profile();
            debug!(target: "voices", flight = %flight, ?profile, "Created voice for flight");
            self.voices.insert(flight.clone(), profile);
        }
        &self.voices[flight]
    }

    /// Fresh profile with a catalog voice (if any) and randomized delivery.
    pub fn random_profile(&mut self) -> VoiceProfile {
        let voice = self.pick_voice();
        VoiceProfile {
            voice,
            rate: round2(self.rng.gen_range(RATE_RANGE)),
            pitch: round2(self.rng.gen_range(PITCH_RANGE)),
            volume: round2(self.rng.gen_range(VOLUME_RANGE)),
        }
    }

    /// The operator's voice, created on first use.
    pub fn self_voice(&mut self) -> &VoiceProfile {
        let catalog = &self.catalog;
        self.self_voice.get_or_insert_with(|| {
            let voice = catalog.voices().into_iter().next();
            debug!(target: "voices", ?voice, "Creating our voice");
            VoiceProfile {
                voice,
                rate: SELF_RATE,
                pitch: SELF_PITCH,
                volume: SELF_VOLUME,
            }
        })
    }

    /// Attach a catalog voice to every profile that has none yet.
    ///
    /// Resolved profiles are left alone. Returns how many were fixed.
    pub fn reconcile(&mut self) -> usize {
        let available = self.catalog.voices();
        let mut fixed = 0;

        if !available.is_empty() {
            for profile in self.voices.values_mut().filter(|p| p.voice.is_none()) {
                profile.voice = select_voice(&available, self.selection, &mut self.rng);
                fixed += 1;
            }
            if let Some(profile) = self.self_voice.as_mut().filter(|p| p.voice.is_none()) {
                profile.voice = available.first().cloned();
                fixed += 1;
            }
        }

        info!(
            target: "voices",
            fixed,
            catalog = available.len(),
            "Fixed up {} missing voices",
            fixed
        );
        fixed
    }

    fn pick_voice(&mut self) -> Option<VoiceHandle> {
        let available = self.catalog.voices();
        select_voice(&available, self.selection, &mut self.rng)
    }
}

fn select_voice(
    available: &[VoiceHandle],
    selection: VoiceSelection,
    rng: &mut StdRng,
) -> Option<VoiceHandle> {
    match selection {
        VoiceSelection::First => available.first().cloned(),
        VoiceSelection::Random => available.choose(rng).cloned(),
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
