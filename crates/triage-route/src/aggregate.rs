//! Per-label counts over one batch.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::label::TopicLabel;

/// Count of records per label. Holds exactly the labels present, each >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopicCounts<L: Ord = TopicLabel> {
    counts: BTreeMap<L, usize>,
}

impl<L: Ord> Default for TopicCounts<L> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<L: Ord + Clone> TopicCounts<L> {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        let mut counts = BTreeMap::new();
        for label in labels {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, label: &L) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// The count of each record's own label, in record order.
    pub fn annotate(&self, labels: &[L]) -> Vec<usize> {
        labels.iter().map(|l| self.get(l)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, usize)> {
        self.counts.iter().map(|(l, c)| (l, *c))
    }

    /// Labels by descending count; equal counts keep label order.
    pub fn ranked(&self) -> Vec<(&L, usize)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

pub fn aggregate<'a, L, I>(labels: I) -> TopicCounts<L>
where
    L: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a L>,
{
    TopicCounts::from_labels(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_annotates_each_row() {
        let labels = vec!["A", "B", "A"];
        let counts = aggregate(&labels);
        assert_eq!(counts.get(&"A"), 2);
        assert_eq!(counts.get(&"B"), 1);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.annotate(&labels), vec![2, 1, 2]);
    }

    #[test]
    fn covers_exactly_the_labels_present() {
        let labels = vec![TopicLabel::Outlier, TopicLabel::PasswordReset, TopicLabel::Outlier];
        let counts = aggregate(&labels);
        assert_eq!(counts.get(&TopicLabel::Unknown), 0);
        assert_eq!(counts.total(), 3);
        assert!(counts.iter().all(|(_, c)| c >= 1));
        assert_eq!(counts.ranked()[0], (&TopicLabel::Outlier, 2));
    }

    #[test]
    fn serializes_as_label_map() {
        let counts = aggregate(&[TopicLabel::PasswordReset, TopicLabel::PasswordReset]);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"Lupa Password/Reset Password":2}"#);
    }

    #[test]
    fn empty_batch_has_no_labels() {
        let counts: TopicCounts = aggregate(&[]);
        assert!(counts.is_empty());
    }
}
