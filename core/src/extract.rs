//! Fixed-grammar extractors for the few structured fields the status feed carries.
//!
//! The feed vocabulary is narrow: a field always follows its anchor keyword
//! after exactly one space (`"runway 27l."`, `"heading 270."`). The extractors
//! rely on that shape instead of parsing the sentence.

use crate::{Result, SpeechError};

/// Token that follows `keyword` in `body`, with `.` and `,` removed.
///
/// Only the text up to the next occurrence of `keyword` is considered. The
/// caller must have checked that `keyword` occurs in `body`; a missing keyword
/// or a keyword with nothing after it yields [`SpeechError::MissingSegment`].
pub fn extract_after_keyword(body: &str, keyword: &str) -> Result<String> {
    let missing = || SpeechError::MissingSegment {
        keyword: keyword.to_string(),
        text: body.to_string(),
    };

    let chunk = body.split(keyword).nth(1).ok_or_else(missing)?;
    // Index 0 is the empty string left by the space after the keyword
    let token = chunk.split(' ').nth(1).ok_or_else(missing)?;

    Ok(token.replace(&['.', ','][..], ""))
}

/// Spoken form of a runway designator: `"27l"` -> `"2 7 left"`.
pub fn phonetic_runway(token: &str) -> Result<String> {
    let parts = token
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            d if d.is_ascii_digit() => Ok(d.to_string()),
            'l' => Ok("left".to_string()),
            'c' => Ok("center".to_string()),
            'r' => Ok("right".to_string()),
            other => Err(SpeechError::RunwayDesignator(other)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join(" "))
}

/// Spoken form of a heading: `"270°"` -> `"2 7 0"`.
pub fn phonetic_degrees(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != '°')
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}
