//! Complaint text preparation for helpdesk triage
//!
//! Turns a raw helpdesk record (incident number, summary, free-text notes) into
//! the cleaned text the topic router consumes:
//! - Boilerplate stripping (greeting, forwarded-email preamble, signatures)
//! - Sensitive-field and noise redaction, summary join, subject-prefix removal
//! - Normalization (charset, stopwords, abbreviation expansion)
//!
//! All patterns, denylists and stopwords live in versioned data files
//! (`lexicon.json`, a stopword list). Built-in copies ship with the crate and can
//! be overridden per run.
//!
//! Every stage is a pure function from one value to a new value; nothing is
//! mutated in place.

pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod redact;
pub mod strip;

pub use lexicon::*;
pub use normalize::{clean_tokens, Normalizer};
pub use pipeline::TextPipeline;
pub use record::{CleanedRecord, Record};
pub use redact::Redactor;
pub use strip::{BoilerplateStripper, COMPLAINT_NOT_FOUND};
