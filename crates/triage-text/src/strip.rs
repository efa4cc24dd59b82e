//! Boilerplate stripping
//!
//! Recovers the complaint body from a forwarded helpdesk email: drops the
//! desk greeting, skips past the last external-sender preamble, and cuts the
//! text at the first signature or quoted-thread anchor.

use regex::Regex;

use crate::lexicon::{compile_patterns, LexiconError, LexiconFileV1};

/// Returned when the notes field is missing or blank.
pub const COMPLAINT_NOT_FOUND: &str = "Bagian komplain tidak ditemukan.";

#[derive(Debug, Clone)]
pub struct BoilerplateStripper {
    greetings: Vec<Regex>,
    preambles: Vec<Regex>,
    closings: Vec<Regex>,
}

impl BoilerplateStripper {
    pub fn from_lexicon(lexicon: &LexiconFileV1) -> Result<Self, LexiconError> {
        Ok(Self {
            greetings: compile_patterns("greeting_patterns", &lexicon.greeting_patterns, false)?,
            preambles: compile_patterns("preamble_patterns", &lexicon.preamble_patterns, true)?,
            closings: compile_patterns("closing_patterns", &lexicon.closing_patterns, true)?,
        })
    }

    pub fn strip(&self, notes: Option<&str>) -> String {
        let Some(notes) = notes.filter(|n| !n.trim().is_empty()) else {
            return COMPLAINT_NOT_FOUND.to_string();
        };

        let mut text = notes.to_string();
        for greeting in &self.greetings {
            text = greeting.replace_all(&text, "").into_owned();
        }

        // Last preamble wins: the newest message sits after the last forward.
        let mut body_start = None;
        for preamble in &self.preambles {
            if let Some(m) = preamble.find_iter(&text).last() {
                body_start = Some(m.end());
            }
        }
        if let Some(start) = body_start {
            text = text[start..].trim().to_string();
        }

        for closing in &self.closings {
            if let Some(m) = closing.find(&text) {
                tracing::trace!(anchor = m.as_str(), "closing anchor");
                text = text[..m.start()].trim().to_string();
            }
        }

        text
    }
}
