//! Status line to phonetic utterance.
//!
//! A status line has the shape `"<subject>: <body>"`. The subject is spelled
//! out (letters with the phonetic alphabet, digits one by one), followed by an
//! audible pause and the body, rewritten by the first matching rule:
//!
//! | body contains            | spoken body                                  |
//! |--------------------------|----------------------------------------------|
//! | `must be no higher`      | `we are not ready to intercept the runway`   |
//! | `entering terminal area` | `ready for approach`                         |
//! | `fly heading`            | heading digits spaced out in place           |
//! | `runway`                 | runway designator spelled out in place       |
//! | anything else            | verbatim                                     |

use crate::extract::{extract_after_keyword, phonetic_degrees, phonetic_runway};
use crate::phonetic::phonetic_char;
use crate::{Result, SpeechError};

/// Separator between subject and body in a status line.
pub const LINE_SEPARATOR: &str = ": ";

/// Gap between the spoken flight id and the message body.
pub const PAUSE_MARKER: &str = " . ! ";

/// Spoken between the letter and digit halves of a flight id.
const ID_PAUSE: &str = " , ";

const ALTITUDE_RESTRICTION: &str = "must be no higher";
const ALTITUDE_RESTRICTION_REPLY: &str = "we are not ready to intercept the runway";
const TERMINAL_AREA: &str = "entering terminal area";
const TERMINAL_AREA_REPLY: &str = "ready for approach";
const FLY_HEADING: &str = "fly heading";
const HEADING: &str = "heading";
const RUNWAY: &str = "runway";

/// Build the full utterance for one status line.
pub fn transcode(raw_line: &str) -> Result<String> {
    let (subject, body) = raw_line
        .split_once(LINE_SEPARATOR)
        .ok_or_else(|| SpeechError::MalformedLine(raw_line.to_string()))?;

    let subject = subject.to_lowercase();
    let body = body.to_lowercase();

    let mut utterance = phonetic_flight_id(&subject)?;
    utterance.push_str(PAUSE_MARKER);
    utterance.push_str(&phonetic_body(&body)?);

    Ok(utterance)
}

/// Spell a flight id: `"ual45"` -> `"Uniform Alfa Lima , 4 5"`.
///
/// Everything before the first digit goes through the phonetic alphabet;
/// everything from it on is spaced out as is. A subject without digits still
/// gets the separator, with an empty tail.
pub fn phonetic_flight_id(subject: &str) -> Result<String> {
    let chars: Vec<char> = subject.chars().collect();
    let split = chars
        .iter()
        .position(|c| c.is_ascii_digit())
        .unwrap_or(chars.len());
    let (letters, tail) = chars.split_at(split);

    let letters = letters
        .iter()
        .map(|c| phonetic_char(*c))
        .collect::<Result<Vec<_>>>()?;
    let tail = tail.iter().map(char::to_string).collect::<Vec<_>>();

    Ok(format!("{}{}{}", letters.join(" "), ID_PAUSE, tail.join(" ")))
}

fn phonetic_body(body: &str) -> Result<String> {
    if body.contains(ALTITUDE_RESTRICTION) {
        return Ok(ALTITUDE_RESTRICTION_REPLY.to_string());
    }
    if body.contains(TERMINAL_AREA) {
        return Ok(TERMINAL_AREA_REPLY.to_string());
    }
    if body.contains(FLY_HEADING) {
        let degrees = extract_after_keyword(body, HEADING)?;
        return Ok(body.replacen(&degrees, &phonetic_degrees(&degrees), 1));
    }
    if body.contains(RUNWAY) {
        let runway = extract_after_keyword(body, RUNWAY)?;
        return Ok(body.replacen(&runway, &phonetic_runway(&runway)?, 1));
    }
    Ok(body.to_string())
}
