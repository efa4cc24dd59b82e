//! Topic model interface
//!
//! Every model, local artifact or remote service, answers the same contract:
//! given a list of documents, return one topic id and one probability per
//! document. Topic id `-1` is the outlier cluster.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub type TopicId = i64;

/// Topic id a clustering model assigns to documents it cannot place.
pub const OUTLIER_TOPIC: TopicId = -1;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub topics: Vec<TopicId>,
    #[serde(default)]
    pub probabilities: Vec<f32>,
}

impl Transform {
    /// Reject a response whose length does not match the request.
    pub fn expect_len(self, model: &str, expected: usize) -> Result<Self, ModelError> {
        if self.topics.len() != expected {
            return Err(ModelError::Shape {
                model: model.to_string(),
                expected,
                found: self.topics.len(),
            });
        }
        Ok(self)
    }
}

/// A pretrained topic model, read-only after loading.
pub trait TopicModel: Send + Sync {
    fn name(&self) -> &str;

    /// Assign a topic to each document, in input order.
    fn transform(&self, documents: &[String]) -> Result<Transform, ModelError>;

    /// Number of non-outlier topics, when the model can tell.
    fn topic_count(&self) -> Option<usize> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model {model:?} not found in {location}")]
    NotFound { model: String, location: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid artifact for model {model:?}: {source}")]
    Parse {
        model: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid model {model:?}: {reason}")]
    Invalid { model: String, reason: String },
    #[error("model {model:?} http error: {message}")]
    Http { model: String, message: String },
    #[error("model {model:?} timed out after {}s", .after.as_secs())]
    Timeout { model: String, after: Duration },
    #[error("model {model:?} returned {found} topics for {expected} documents")]
    Shape {
        model: String,
        expected: usize,
        found: usize,
    },
    #[error("model {model:?} inference worker failed: {reason}")]
    Worker { model: String, reason: String },
}

impl ModelError {
    /// Transient I/O worth one more attempt when loading.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModelError::Io { .. } | ModelError::Http { .. })
    }
}
