//! Speech backends for ATC Speech
//!
//! - `espeak`: voice catalog and speech engine driving the espeak-ng CLI
//! - `fallback`: engine that only logs, for machines without a synthesizer

pub(crate) mod utils;

pub mod espeak;
pub mod fallback;

pub use espeak::{EspeakCatalog, EspeakConfig, EspeakEngine};
pub use fallback::{fallback_catalog, LogOnlyEngine};
