//! Keyword-weight topic model artifacts
//!
//! A clustering topic model is summarized by the weighted keywords that
//! represent each cluster. This module scores documents against such a
//! representation, so a model exported from the training environment can be
//! served without the training stack.
//!
//! Scoring: for each topic, the sum of the weights of the document's tokens
//! divided by the token count. The best topic wins (ties go to the lower id).
//! An empty document, or a best score below `outlier_threshold`, is an outlier.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::model::{ModelError, TopicId, TopicModel, Transform, OUTLIER_TOPIC};

pub const MODEL_ARTIFACT_VERSION_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTopicV1 {
    pub id: TopicId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub words: Vec<(String, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordModelFileV1 {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub outlier_threshold: f32,
    pub topics: Vec<KeywordTopicV1>,
}

#[derive(Debug, Clone)]
struct ScoredTopic {
    id: TopicId,
    weights: HashMap<String, f32>,
}

#[derive(Debug, Clone)]
pub struct KeywordTopicModel {
    name: String,
    outlier_threshold: f32,
    topics: Vec<ScoredTopic>,
}

impl KeywordTopicModel {
    pub fn from_file(file: KeywordModelFileV1) -> Result<Self, ModelError> {
        let invalid = |reason: String| ModelError::Invalid {
            model: file.name.clone(),
            reason,
        };
        if file.version != MODEL_ARTIFACT_VERSION_V1 {
            return Err(invalid(format!(
                "unsupported artifact version {} (expected {MODEL_ARTIFACT_VERSION_V1})",
                file.version
            )));
        }
        if !file.outlier_threshold.is_finite() || file.outlier_threshold < 0.0 {
            return Err(invalid("outlier_threshold must be a finite value >= 0".to_string()));
        }

        let mut seen = BTreeSet::new();
        let mut topics = Vec::with_capacity(file.topics.len());
        for topic in &file.topics {
            if topic.id == OUTLIER_TOPIC {
                return Err(invalid("topic id -1 is reserved for outliers".to_string()));
            }
            if !seen.insert(topic.id) {
                return Err(invalid(format!("duplicate topic id {}", topic.id)));
            }
            let mut weights = HashMap::with_capacity(topic.words.len());
            for (word, weight) in &topic.words {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(invalid(format!(
                        "topic {} word {word:?} has invalid weight {weight}",
                        topic.id
                    )));
                }
                *weights.entry(word.to_lowercase()).or_insert(0.0) += *weight;
            }
            topics.push(ScoredTopic {
                id: topic.id,
                weights,
            });
        }
        topics.sort_by_key(|t| t.id);

        Ok(Self {
            name: file.name,
            outlier_threshold: file.outlier_threshold,
            topics,
        })
    }

    pub fn from_json_str(json: &str, name: &str) -> Result<Self, ModelError> {
        let file: KeywordModelFileV1 =
            serde_json::from_str(json).map_err(|source| ModelError::Parse {
                model: name.to_string(),
                source,
            })?;
        Self::from_file(file)
    }

    pub fn load(path: &Path, name: &str) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json, name)
    }

    fn score(&self, document: &str) -> (TopicId, f32) {
        let tokens: Vec<&str> = document.split_whitespace().collect();
        if tokens.is_empty() || self.topics.is_empty() {
            return (OUTLIER_TOPIC, 0.0);
        }

        let n = tokens.len() as f32;
        let mut best: Option<(TopicId, f32)> = None;
        let mut total = 0.0f32;
        for topic in &self.topics {
            let score = tokens
                .iter()
                .filter_map(|t| topic.weights.get(*t))
                .sum::<f32>()
                / n;
            total += score;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((topic.id, score));
            }
        }

        match best {
            Some((id, score)) if score > 0.0 && score >= self.outlier_threshold => {
                (id, score / total)
            }
            _ => (OUTLIER_TOPIC, 0.0),
        }
    }
}

impl TopicModel for KeywordTopicModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, documents: &[String]) -> Result<Transform, ModelError> {
        let (topics, probabilities) = documents.iter().map(|d| self.score(d)).unzip();
        Ok(Transform {
            topics,
            probabilities,
        })
    }

    fn topic_count(&self) -> Option<usize> {
        Some(self.topics.len())
    }
}
