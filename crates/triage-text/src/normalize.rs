//! Text normalization
//!
//! Output alphabet is `[a-z ]`: lowercase ASCII words separated by single
//! spaces, no leading or trailing space. Digits, punctuation and non-ASCII
//! letters are dropped on purpose (product codes carry no topic signal here).
//!
//! `normalize` is idempotent. Two lexicon rules guarantee it:
//! - words produced by an expansion are never stopwords, and
//! - an expansion never produces its own source or the source of a later
//!   expansion (later rules may consume what earlier ones produce).

use std::collections::HashSet;

use crate::lexicon::{LexiconError, LexiconFileV1, StopwordList};

/// Lowercase, keep only `a-z` and whitespace, split on whitespace.
pub fn clean_tokens(text: &str) -> Vec<String> {
    let filtered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    filtered.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone)]
struct Expansion {
    from: String,
    to: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
    phrases: Vec<Vec<String>>,
    expansions: Vec<Expansion>,
}

impl Normalizer {
    pub fn new(lexicon: &LexiconFileV1, general: &StopwordList) -> Result<Self, LexiconError> {
        let expansions = lexicon
            .expansions
            .iter()
            .map(|e| {
                let to = clean_tokens(&e.to);
                if e.from.trim().is_empty() || e.from.split_whitespace().count() != 1 {
                    return Err(expansion_error(e.from.as_str(), e.to.as_str(), "source must be a single word"));
                }
                if to.is_empty() || to.join(" ") != e.to {
                    return Err(expansion_error(
                        e.from.as_str(),
                        e.to.as_str(),
                        "target must be lowercase a-z words separated by single spaces",
                    ));
                }
                Ok(Expansion {
                    from: e.from.clone(),
                    to,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let produced: HashSet<&str> = expansions
            .iter()
            .flat_map(|e| e.to.iter().map(String::as_str))
            .collect();
        // A rule may consume what an earlier rule produced, never what it or a
        // later rule produces: those words would survive one pass unexpanded.
        for (i, e) in expansions.iter().enumerate() {
            if expansions[i..].iter().any(|later| later.to.contains(&e.from)) {
                return Err(expansion_error(
                    e.from.as_str(),
                    &e.to.join(" "),
                    "source is produced by this or a later expansion",
                ));
            }
        }

        let mut stopwords = HashSet::new();
        let mut phrases = Vec::new();
        for entry in general.words().iter().chain(lexicon.domain_stopwords.iter()) {
            let mut tokens = clean_tokens(entry);
            match tokens.len() {
                0 => {}
                1 => {
                    if let Some(word) = tokens.pop() {
                        if produced.contains(word.as_str()) {
                            tracing::debug!(word = %word, "stopword kept: produced by an expansion");
                        } else {
                            stopwords.insert(word);
                        }
                    }
                }
                _ => {
                    if let Some(word) = tokens.iter().find(|t| produced.contains(t.as_str())) {
                        return Err(expansion_error(
                            word,
                            entry,
                            "expansion output appears in a stopword phrase",
                        ));
                    }
                    phrases.push(tokens);
                }
            }
        }
        // Longest phrase first so overlapping entries remove the most text.
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();

        Ok(Self {
            stopwords,
            phrases,
            expansions,
        })
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn normalize(&self, text: &str) -> String {
        let tokens = self.remove_stopwords(clean_tokens(text));
        let expanded = self.expand(tokens).join(" ");
        self.remove_stopwords(clean_tokens(&expanded)).join(" ")
    }

    fn remove_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        let mut tokens: Vec<String> = tokens
            .into_iter()
            .filter(|t| !self.stopwords.contains(t))
            .collect();
        if self.phrases.is_empty() {
            return tokens;
        }
        // Removing a phrase can join its neighbours into another one.
        loop {
            let mut kept = Vec::with_capacity(tokens.len());
            let mut changed = false;
            let mut i = 0;
            while i < tokens.len() {
                let hit = self
                    .phrases
                    .iter()
                    .find(|p| tokens[i..].starts_with(p.as_slice()));
                match hit {
                    Some(phrase) => {
                        i += phrase.len();
                        changed = true;
                    }
                    None => {
                        kept.push(std::mem::take(&mut tokens[i]));
                        i += 1;
                    }
                }
            }
            tokens = kept;
            if !changed {
                return tokens;
            }
        }
    }

    fn expand(&self, tokens: Vec<String>) -> Vec<String> {
        self.expansions.iter().fold(tokens, |tokens, expansion| {
            let mut out = Vec::with_capacity(tokens.len());
            for token in tokens {
                if token == expansion.from {
                    out.extend(expansion.to.iter().cloned());
                } else {
                    out.push(token);
                }
            }
            out
        })
    }
}

fn expansion_error(from: &str, to: &str, reason: &str) -> LexiconError {
    LexiconError::Expansion {
        from: from.to_string(),
        to: to.to_string(),
        reason: reason.to_string(),
    }
}
