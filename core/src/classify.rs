//! Routing of raw status lines.

use serde::{Deserialize, Serialize};

/// Simulator replies that carry no radio traffic.
pub const IGNORED_PHRASES: [&str; 4] = [
    "invalid flight id",
    "invalid command",
    "you must first assign",
    "improper exit",
];

/// Phrases only the controller's own commands contain.
pub const COMMAND_PHRASES: [&str; 9] = [
    "line up and wait",
    "and maintain",
    "fly heading",
    "cleared to",
    "cleared for",
    "vector to",
    "speed to",
    "hold at",
    "abort",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    /// Dropped without transcoding.
    Ignorable,
    /// Echo of a command the operator issued.
    SelfOriginated,
    /// Radio traffic from a flight.
    ThirdParty,
}

/// Keyword matcher deciding how a status line is routed.
///
/// Ignorability always wins over the self/third-party split.
#[derive(Debug, Clone)]
pub struct MessageClassifier {
    ignored: Vec<String>,
    commands: Vec<String>,
}

impl Default for MessageClassifier {
    fn default() -> Self {
        Self {
            ignored: IGNORED_PHRASES.iter().map(|s| s.to_string()).collect(),
            commands: COMMAND_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MessageClassifier {
    /// Append phrases to the rejection list.
    pub fn with_ignored_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored.extend(normalize_phrases(phrases));
        self
    }

    /// Append phrases to the command list.
    pub fn with_command_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.commands.extend(normalize_phrases(phrases));
        self
    }

    pub fn classify(&self, raw_line: &str) -> MessageCategory {
        let line = raw_line.to_lowercase();

        // "UAL45:" carries a subject and nothing else
        if line.split(':').nth(1) == Some("") {
            return MessageCategory::Ignorable;
        }
        if self.ignored.iter().any(|p| line.contains(p.as_str())) {
            return MessageCategory::Ignorable;
        }

        let body = line.split_once(':').map(|(_, body)| body).unwrap_or(line.as_str());
        if self.commands.iter().any(|p| body.contains(p.as_str())) {
            MessageCategory::SelfOriginated
        } else {
            MessageCategory::ThirdParty
        }
    }
}

fn normalize_phrases<I, S>(phrases: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .map(|p| p.as_ref().trim().to_lowercase())
        .filter(|p| !p.is_empty())
}
