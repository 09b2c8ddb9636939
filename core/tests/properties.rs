//! Property checks for the transcoder, classifier and registry

use atc_speech_core::extract::phonetic_runway;
use atc_speech_core::transcode::phonetic_flight_id;
use atc_speech_core::voice::{PITCH_RANGE, RATE_RANGE, VOLUME_RANGE};
use atc_speech_core::{
    transcode, InMemoryCatalog, MessageCategory, MessageClassifier, VoiceCatalog, VoiceRegistry,
    PAUSE_MARKER,
};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #[test]
    fn profiles_stay_in_range(seed in any::<u64>()) {
        let catalog: Arc<dyn VoiceCatalog> = Arc::new(InMemoryCatalog::new());
        let mut registry = VoiceRegistry::new(catalog).with_seed(seed);
        let p = registry.random_profile();
        prop_assert!(RATE_RANGE.contains(&p.rate));
        prop_assert!(PITCH_RANGE.contains(&p.pitch));
        prop_assert!(VOLUME_RANGE.contains(&p.volume));
        prop_assert!(p.voice.is_none());
    }

    #[test]
    fn classify_never_panics(line in ".*") {
        let category = MessageClassifier::default().classify(&line);
        prop_assert!(matches!(
            category,
            MessageCategory::Ignorable | MessageCategory::SelfOriginated | MessageCategory::ThirdParty
        ));
    }

    #[test]
    fn transcode_is_deterministic(line in ".*") {
        let first = transcode(&line).map_err(|e| e.to_string());
        let second = transcode(&line).map_err(|e| e.to_string());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn plain_traffic_keeps_its_body(
        letters in "[a-z]{1,4}",
        digits in "[0-9]{1,4}",
        body in "[a-z ]{0,30}",
    ) {
        prop_assume!(!body.contains("runway") && !body.contains("fly heading"));
        prop_assume!(!body.contains("must be no higher") && !body.contains("entering terminal area"));

        let line = format!("{}{}: {}", letters.to_uppercase(), digits, body);
        let utterance = transcode(&line).unwrap();
        let id = phonetic_flight_id(&format!("{}{}", letters, digits)).unwrap();
        prop_assert_eq!(utterance, format!("{}{}{}", id, PAUSE_MARKER, body));
    }

    #[test]
    fn runway_digits_pass_through(digits in "[0-9]{1,2}", side in "[lcr]?") {
        let spoken = phonetic_runway(&format!("{}{}", digits, side)).unwrap();
        let expected: Vec<String> = digits.chars().map(|c| c.to_string()).collect();
        prop_assert!(spoken.starts_with(&expected.join(" ")));
    }
}
