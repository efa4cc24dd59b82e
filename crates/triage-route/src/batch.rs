//! One batch end to end: clean, route, count.

use serde::Serialize;

use triage_text::{CleanedRecord, Record, TextPipeline};

use crate::aggregate::TopicCounts;
use crate::label::TopicLabel;
use crate::model::ModelError;
use crate::router::TopicClassifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRecord {
    pub cleaned: CleanedRecord,
    pub topic_label: TopicLabel,
    /// Number of records in the batch sharing this record's label.
    pub topic_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub records: Vec<ClassifiedRecord>,
    pub counts: TopicCounts,
}

impl BatchReport {
    /// Records carrying `topic`, or every record when `topic` is `None`.
    pub fn filter_topic(&self, topic: Option<TopicLabel>) -> impl Iterator<Item = &ClassifiedRecord> {
        self.records
            .iter()
            .filter(move |r| topic.map_or(true, |t| r.topic_label == t))
    }

    /// Distinct labels present, in label order.
    pub fn topics(&self) -> Vec<TopicLabel> {
        self.counts.iter().map(|(l, _)| *l).collect()
    }
}

pub fn classify_batch(
    pipeline: &TextPipeline,
    classifier: &TopicClassifier,
    records: &[Record],
) -> Result<BatchReport, ModelError> {
    classify_cleaned(classifier, pipeline.clean_batch(records))
}

/// Route already-cleaned records and attach per-label counts.
pub fn classify_cleaned(
    classifier: &TopicClassifier,
    cleaned: Vec<CleanedRecord>,
) -> Result<BatchReport, ModelError> {
    let texts: Vec<String> = cleaned.iter().map(|c| c.cleaned_complaint.clone()).collect();
    let labels = classifier.route_batch(&texts)?;
    let counts = TopicCounts::from_labels(&labels);
    let annotated = counts.annotate(&labels);

    let records = cleaned
        .into_iter()
        .zip(labels)
        .zip(annotated)
        .map(|((cleaned, topic_label), topic_count)| ClassifiedRecord {
            cleaned,
            topic_label,
            topic_count,
        })
        .collect();

    tracing::info!(
        records = texts.len(),
        topics = counts.len(),
        "classified batch"
    );
    Ok(BatchReport { records, counts })
}
