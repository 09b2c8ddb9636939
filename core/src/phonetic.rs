//! NATO phonetic spelling alphabet.

use crate::{Result, SpeechError};

const ALPHABET: [&str; 26] = [
    "Alfa", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India", "Juliett",
    "Kilo", "Lima", "Mike", "November", "Oscar", "Papa", "Quebec", "Romeo", "Sierra", "Tango",
    "Uniform", "Victor", "Whiskey", "Xray", "Yankee", "Zulu",
];

/// Spoken word for a lowercase ASCII letter.
///
/// Digits and everything else are rejected; callers decide how to voice them.
pub fn phonetic_char(c: char) -> Result<&'static str> {
    if c.is_ascii_lowercase() {
        Ok(ALPHABET[(c as u8 - b'a') as usize])
    } else {
        Err(SpeechError::UnsupportedCharacter(c))
    }
}
