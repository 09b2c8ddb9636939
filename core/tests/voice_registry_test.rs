//! Per-flight voice assignment and catalog reconciliation

mod common;

use atc_speech_core::voice::{PITCH_RANGE, RATE_RANGE, VOLUME_RANGE};
use atc_speech_core::{FlightId, InMemoryCatalog, VoiceCatalog, VoiceRegistry, VoiceSelection};
use common::{voice, voices};
use std::sync::Arc;

fn registry_with(catalog: &Arc<InMemoryCatalog>) -> VoiceRegistry {
    let catalog: Arc<dyn VoiceCatalog> = catalog.clone();
    VoiceRegistry::new(catalog).with_seed(42)
}

fn is_rounded(v: f32) -> bool {
    ((v * 100.0).round() / 100.0 - v).abs() < 1e-6
}

#[test]
fn flight_ids_are_case_insensitive() {
    assert_eq!(FlightId::new("UAL45"), FlightId::new("ual45"));
    assert_eq!(FlightId::from_status_line("UAL45: hello").as_str(), "ual45");
    assert_eq!(FlightId::from_status_line("no colon").as_str(), "no colon");
}

#[test]
fn get_or_create_is_idempotent() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a", "b"])));
    let mut registry = registry_with(&catalog);

    let first = registry.get_or_create(&FlightId::new("UAL45")).clone();
    let second = registry.get_or_create(&FlightId::new("ual45")).clone();

    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
}

#[test]
fn distinct_flights_get_their_own_profiles() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a"])));
    let mut registry = registry_with(&catalog);

    for id in ["ual45", "dal12", "aal7", "swa88"] {
        registry.get_or_create(&FlightId::new(id));
    }
    assert_eq!(registry.len(), 4);
    assert!(registry.get(&FlightId::new("dal12")).is_some());
    assert!(registry.get(&FlightId::new("nks1")).is_none());
}

#[test]
fn random_profiles_stay_in_range() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a"])));
    let mut registry = registry_with(&catalog);

    for _ in 0..500 {
        let p = registry.random_profile();
        assert!(RATE_RANGE.contains(&p.rate), "rate {}", p.rate);
        assert!(PITCH_RANGE.contains(&p.pitch), "pitch {}", p.pitch);
        assert!(VOLUME_RANGE.contains(&p.volume), "volume {}", p.volume);
        assert!(is_rounded(p.rate) && is_rounded(p.pitch) && is_rounded(p.volume));
    }
}

#[test]
fn first_selection_always_picks_catalog_head() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a", "b", "c"])));
    let mut registry = registry_with(&catalog);

    for i in 0..50 {
        let p = registry.get_or_create(&FlightId::new(&format!("ual{}", i)));
        assert_eq!(p.voice, Some(voice("a")));
    }
}

#[test]
fn random_selection_stays_within_catalog() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a", "b", "c"])));
    let mut registry = registry_with(&catalog).with_selection(VoiceSelection::Random);
    let available = catalog.voices();

    for _ in 0..50 {
        let p = registry.random_profile();
        assert!(available.contains(p.voice.as_ref().unwrap()));
    }
}

#[test]
fn profiles_created_before_catalog_are_unresolved() {
    let catalog = Arc::new(InMemoryCatalog::new());
    let mut registry = registry_with(&catalog);

    let p = registry.get_or_create(&FlightId::new("ual45"));
    assert!(!p.is_resolved());
}

#[test]
fn reconcile_backfills_only_missing_voices() {
    let catalog = Arc::new(InMemoryCatalog::new());
    let mut registry = registry_with(&catalog);

    let early = registry.get_or_create(&FlightId::new("ual45")).clone();
    assert_eq!(registry.reconcile(), 0, "nothing to attach from an empty catalog");

    catalog.replace(voices(&["a", "b"]));
    let late = registry.get_or_create(&FlightId::new("dal12")).clone();
    assert_eq!(late.voice, Some(voice("a")));

    assert_eq!(registry.reconcile(), 1);
    let fixed = registry.get(&FlightId::new("ual45")).unwrap();
    assert_eq!(fixed.voice, Some(voice("a")));
    assert_eq!(
        (fixed.rate, fixed.pitch, fixed.volume),
        (early.rate, early.pitch, early.volume)
    );

    // Already resolved profiles keep their voice even if the catalog changes
    catalog.replace(voices(&["z"]));
    assert_eq!(registry.reconcile(), 0);
    assert_eq!(
        registry.get(&FlightId::new("dal12")).unwrap().voice,
        Some(voice("a"))
    );
}

#[test]
fn self_voice_is_a_fixed_singleton() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a", "b"])));
    let mut registry = registry_with(&catalog);

    let ours = registry.self_voice().clone();
    assert_eq!(ours.voice, Some(voice("a")));
    assert_eq!((ours.rate, ours.pitch, ours.volume), (4.0, 0.01, 0.25));

    catalog.replace(voices(&["z"]));
    assert_eq!(registry.self_voice(), &ours);
    assert!(registry.is_empty(), "self voice lives outside the flight map");
}

#[test]
fn reconcile_also_fixes_self_voice() {
    let catalog = Arc::new(InMemoryCatalog::new());
    let mut registry = registry_with(&catalog);
    assert!(!registry.self_voice().is_resolved());

    catalog.replace(voices(&["a", "b"]));
    assert_eq!(registry.reconcile(), 1);
    assert_eq!(registry.self_voice().voice, Some(voice("a")));
}

#[test]
fn seeded_registries_draw_the_same_profiles() {
    let catalog = Arc::new(InMemoryCatalog::with_voices(voices(&["a"])));
    let mut one = registry_with(&catalog);
    let mut two = registry_with(&catalog);

    for id in ["ual45", "dal12"] {
        assert_eq!(
            one.get_or_create(&FlightId::new(id)),
            two.get_or_create(&FlightId::new(id))
        );
    }
}
