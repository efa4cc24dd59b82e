//! Routing behaviour against stub models.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use triage_route::{ModelError, TopicClassifier, TopicId, TopicLabel, TopicModel, Transform};

/// Returns a fixed topic, or a per-document override, and counts its calls.
struct Stub {
    name: &'static str,
    default: TopicId,
    by_text: HashMap<String, TopicId>,
    calls: AtomicUsize,
}

impl Stub {
    fn fixed(name: &'static str, topic: TopicId) -> Arc<Self> {
        Arc::new(Self {
            name,
            default: topic,
            by_text: HashMap::new(),
            calls: AtomicUsize::new(0),
        })
    }

    fn mapped(name: &'static str, default: TopicId, pairs: &[(&str, TopicId)]) -> Arc<Self> {
        Arc::new(Self {
            name,
            default,
            by_text: pairs.iter().map(|(t, id)| (t.to_string(), *id)).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TopicModel for Stub {
    fn name(&self) -> &str {
        self.name
    }

    fn transform(&self, documents: &[String]) -> Result<Transform, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let topics: Vec<TopicId> = documents
            .iter()
            .map(|d| self.by_text.get(d).copied().unwrap_or(self.default))
            .collect();
        Ok(Transform {
            probabilities: vec![0.9; topics.len()],
            topics,
        })
    }
}

/// Always answers with one topic fewer than asked.
struct ShortAnswer;

impl TopicModel for ShortAnswer {
    fn name(&self) -> &str {
        "short"
    }

    fn transform(&self, documents: &[String]) -> Result<Transform, ModelError> {
        Ok(Transform {
            topics: vec![0; documents.len().saturating_sub(1)],
            probabilities: Vec::new(),
        })
    }
}

fn classifier(primary: TopicId, outlier: TopicId, cluster_one: TopicId) -> TopicClassifier {
    TopicClassifier::new(
        Stub::fixed("primary", primary),
        Stub::fixed("outlier", outlier),
        Stub::fixed("cluster_one", cluster_one),
    )
}

#[test]
fn cluster_one_password_subtopic() {
    let c = classifier(1, 0, 1);
    assert_eq!(c.route("lupa password").unwrap(), TopicLabel::PasswordReset);
}

#[test]
fn cluster_one_other_subtopics() {
    assert_eq!(classifier(1, 0, 0).route("x").unwrap(), TopicLabel::ApplicationAccess);
    assert_eq!(classifier(1, 0, 2).route("x").unwrap(), TopicLabel::WrongUsername);
    assert_eq!(classifier(1, 0, 9).route("x").unwrap(), TopicLabel::Unknown);
}

#[test]
fn outlier_install_subtopic() {
    assert_eq!(
        classifier(-1, 2, 0).route("install client").unwrap(),
        TopicLabel::ClientInstall
    );
    assert_eq!(classifier(-1, 0, 0).route("x").unwrap(), TopicLabel::Outlier);
    assert_eq!(classifier(-1, -1, 0).route("x").unwrap(), TopicLabel::Outlier);
    assert_eq!(classifier(-1, 7, 0).route("x").unwrap(), TopicLabel::Outlier);
}

#[test]
fn fixed_primary_labels() {
    let expected = [
        (0, TopicLabel::AccessRequestAroRo),
        (2, TopicLabel::FileValidation),
        (3, TopicLabel::DeadlineExtension),
        (4, TopicLabel::UploadFailure),
        (5, TopicLabel::ApoloReporting),
    ];
    for (topic, label) in expected {
        assert_eq!(classifier(topic, 2, 1).route("x").unwrap(), label, "topic {topic}");
    }
}

#[test]
fn out_of_range_primary_is_unknown() {
    assert_eq!(classifier(99, 2, 1).route("x").unwrap(), TopicLabel::Unknown);
}

#[test]
fn empty_text_is_still_routed() {
    let c = classifier(-1, 0, 0);
    assert_eq!(c.route("").unwrap(), TopicLabel::Outlier);
}

#[test]
fn sub_models_only_called_when_needed() {
    let primary = Stub::fixed("primary", 3);
    let outlier = Stub::fixed("outlier", 2);
    let cluster_one = Stub::fixed("cluster_one", 1);
    let c = TopicClassifier::new(primary.clone(), outlier.clone(), cluster_one.clone());

    assert_eq!(c.route("x").unwrap(), TopicLabel::DeadlineExtension);
    assert_eq!(primary.calls(), 1);
    assert_eq!(outlier.calls(), 0);
    assert_eq!(cluster_one.calls(), 0);
}

#[test]
fn batch_matches_row_by_row_routing_with_one_call_per_model() {
    let primary = Stub::mapped(
        "primary",
        99,
        &[("a", 1), ("b", -1), ("c", 4), ("d", 1), ("e", -1)],
    );
    let outlier = Stub::mapped("outlier", 0, &[("b", 2)]);
    let cluster_one = Stub::mapped("cluster_one", 5, &[("a", 1), ("d", 2)]);
    let c = TopicClassifier::new(primary.clone(), outlier.clone(), cluster_one.clone());

    let texts: Vec<String> = ["a", "b", "c", "d", "e", "z"].iter().map(|s| s.to_string()).collect();
    let labels = c.route_batch(&texts).unwrap();
    assert_eq!(
        labels,
        vec![
            TopicLabel::PasswordReset,
            TopicLabel::ClientInstall,
            TopicLabel::UploadFailure,
            TopicLabel::WrongUsername,
            TopicLabel::Outlier,
            TopicLabel::Unknown,
        ]
    );
    assert_eq!(primary.calls(), 1);
    assert_eq!(outlier.calls(), 1);
    assert_eq!(cluster_one.calls(), 1);

    for (text, label) in texts.iter().zip(&labels) {
        assert_eq!(c.route(text).unwrap(), *label, "text {text}");
    }
}

#[test]
fn empty_batch_makes_no_calls() {
    let primary = Stub::fixed("primary", 0);
    let c = TopicClassifier::new(primary.clone(), Stub::fixed("o", 0), Stub::fixed("c", 0));
    assert!(c.route_batch(&[]).unwrap().is_empty());
    assert_eq!(primary.calls(), 0);
}

#[test]
fn short_model_answer_is_an_error() {
    let c = TopicClassifier::new(
        Arc::new(ShortAnswer),
        Stub::fixed("o", 0),
        Stub::fixed("c", 0),
    );
    let err = c.route("x").unwrap_err();
    assert!(matches!(err, ModelError::Shape { expected: 1, found: 0, .. }));
}

#[test]
fn timeout_wrapper_keeps_routing_intact() {
    let c = classifier(1, 0, 1).with_timeout(Some(std::time::Duration::from_secs(5)));
    assert_eq!(c.route("x").unwrap(), TopicLabel::PasswordReset);
    assert_eq!(c.model_names(), ["primary", "outlier", "cluster_one"]);
}
