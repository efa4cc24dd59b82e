//! Sensitive-field and noise redaction
//!
//! Redaction is heuristic. It removes the labelled contact fields helpdesk
//! forms carry (name, email, phone, national id, ...) and truncates at literal
//! fragments captured from real forwarded threads (signatures, disclaimers,
//! letterheads). It is not a compliance-grade PII filter.

use regex::Regex;

use crate::lexicon::{compile_pattern, compile_patterns, LexiconError, LexiconFileV1};

#[derive(Debug, Clone)]
pub struct Redactor {
    sensitive: Vec<Regex>,
    cutoffs: Vec<String>,
    subject_prefix: Regex,
}

impl Redactor {
    pub fn from_lexicon(lexicon: &LexiconFileV1) -> Result<Self, LexiconError> {
        if let Some(index) = lexicon.cutoff_literals.iter().position(|l| l.is_empty()) {
            return Err(LexiconError::EmptyLiteral { index });
        }
        Ok(Self {
            sensitive: compile_patterns(
                "sensitive_field_patterns",
                &lexicon.sensitive_field_patterns,
                false,
            )?,
            cutoffs: lexicon.cutoff_literals.clone(),
            subject_prefix: compile_pattern(
                "subject_prefix_pattern",
                0,
                &lexicon.subject_prefix_pattern,
                false,
            )?,
        })
    }

    /// Remove sensitive fields, then apply the literal denylist in order.
    pub fn redact(&self, text: &str) -> String {
        self.cut_off(&self.remove_sensitive(text))
    }

    /// Delete every sensitive-field match. A label match removes the label and
    /// the rest of its line.
    pub fn remove_sensitive(&self, text: &str) -> String {
        let mut text = text.to_string();
        for pattern in &self.sensitive {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, "").into_owned();
            }
        }
        text
    }

    /// Each denylist literal present keeps only the text before its first
    /// occurrence, so truncations compound in list order.
    pub fn cut_off(&self, text: &str) -> String {
        let mut text = text.to_string();
        for literal in &self.cutoffs {
            if let Some(idx) = text.find(literal.as_str()) {
                tracing::trace!(literal = literal.as_str(), at = idx, "cutoff literal");
                text.truncate(idx);
            }
        }
        text
    }

    /// Join the redacted body with the summary and drop a leading subject line.
    pub fn combine(&self, body: &str, summary: &str) -> String {
        let joined = format!("{body} {summary}");
        self.subject_prefix
            .replace(&joined, "")
            .trim()
            .to_string()
    }
}
