//! Lexicon data files
//!
//! The stripper, redactor and normalizer are driven entirely by data:
//!
//! - `lexicon.json` (`LexiconFileV1`): ordered regex patterns, the literal
//!   cut-off denylist, the subject-prefix pattern, domain stopwords and
//!   abbreviation expansions.
//! - a stopword list: general Indonesian function words, one per line.
//!
//! Order inside every list is significant. Patterns and literals are applied
//! in file order, and the denylist truncations compound.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LEXICON_VERSION_V1: u32 = 1;

const BUILTIN_LEXICON_JSON: &str = include_str!("../data/lexicon.json");
const BUILTIN_STOPWORDS_ID: &str = include_str!("../data/stopwords_id.txt");

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lexicon JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported lexicon version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("invalid regex in {field}[{index}]: {source}")]
    Pattern {
        field: &'static str,
        index: usize,
        #[source]
        source: regex::Error,
    },
    #[error("empty literal in cutoff_literals[{index}]")]
    EmptyLiteral { index: usize },
    #[error("invalid expansion {from:?} -> {to:?}: {reason}")]
    Expansion {
        from: String,
        to: String,
        reason: String,
    },
}

/// Whole-word abbreviation expansion (`from` is one token, `to` one or more).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionV1 {
    pub from: String,
    pub to: String,
}

/// On-disk lexicon, version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconFileV1 {
    pub version: u32,
    /// Salutations removed anywhere in the notes.
    #[serde(default)]
    pub greeting_patterns: Vec<String>,
    /// Forwarded-email preambles; the last match marks the start of the body.
    #[serde(default)]
    pub preamble_patterns: Vec<String>,
    /// Signature/closing anchors; the first match marks the end of the body.
    #[serde(default)]
    pub closing_patterns: Vec<String>,
    /// Sensitive field labels, each deleted together with the rest of its line.
    #[serde(default)]
    pub sensitive_field_patterns: Vec<String>,
    /// Literal noise fragments; text from the first occurrence onward is dropped.
    #[serde(default)]
    pub cutoff_literals: Vec<String>,
    pub subject_prefix_pattern: String,
    /// Domain stopwords; entries with a space are removed as token sequences.
    #[serde(default)]
    pub domain_stopwords: Vec<String>,
    #[serde(default)]
    pub expansions: Vec<ExpansionV1>,
}

impl LexiconFileV1 {
    /// The lexicon shipped with the crate.
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_json_str(BUILTIN_LEXICON_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFileV1 = serde_json::from_str(json)?;
        if file.version != LEXICON_VERSION_V1 {
            return Err(LexiconError::Version {
                found: file.version,
                expected: LEXICON_VERSION_V1,
            });
        }
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let json = read_to_string(path)?;
        let file = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            literals = file.cutoff_literals.len(),
            stopwords = file.domain_stopwords.len(),
            "loaded lexicon"
        );
        Ok(file)
    }

    pub fn to_json_pretty(&self) -> Result<String, LexiconError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// General-purpose stopword list (external linguistic resource).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopwordList {
    words: Vec<String>,
}

impl StopwordList {
    /// Parse a one-word-per-line list. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { words }
    }

    /// The Indonesian list shipped with the crate.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_STOPWORDS_ID)
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let list = Self::parse(&read_to_string(path)?);
        tracing::debug!(path = %path.display(), words = list.len(), "loaded stopword list");
        Ok(list)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn read_to_string(path: &Path) -> Result<String, LexiconError> {
    std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Compile one lexicon field; `dot_all` lets `.` cross newlines.
pub(crate) fn compile_patterns(
    field: &'static str,
    patterns: &[String],
    dot_all: bool,
) -> Result<Vec<Regex>, LexiconError> {
    patterns
        .iter()
        .enumerate()
        .map(|(index, pattern)| compile_pattern(field, index, pattern, dot_all))
        .collect()
}

pub(crate) fn compile_pattern(
    field: &'static str,
    index: usize,
    pattern: &str,
    dot_all: bool,
) -> Result<Regex, LexiconError> {
    RegexBuilder::new(pattern)
        .dot_matches_new_line(dot_all)
        .build()
        .map_err(|source| LexiconError::Pattern {
            field,
            index,
            source,
        })
}
