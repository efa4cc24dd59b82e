//! Two-level topic routing
//!
//! Primary cluster ids are pinned by convention to fixed labels. Two clusters
//! are too coarse on their own and are split again by a sub-model trained only
//! on that cluster's members:
//! - `-1` (outliers): sub-topic `2` is client-install trouble, the rest stays `Outlier`
//! - `1`: access errors, forgotten passwords, wrong usernames
//!
//! Label mapping never fails; anything unmapped is `Unknown`. Errors come only
//! from the models themselves.

use std::sync::Arc;
use std::time::Duration;

use crate::label::TopicLabel;
use crate::model::{ModelError, TopicId, TopicModel, OUTLIER_TOPIC};
use crate::store::{ModelNames, ModelStore};
use crate::timeout::TimeoutModel;

/// Primary cluster whose members go to the cluster-one sub-model.
pub const CLUSTER_ONE: TopicId = 1;
/// Outlier sub-topic meaning "cannot install the client application".
pub const CLIENT_INSTALL_SUBTOPIC: TopicId = 2;

/// What the primary topic id decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryRoute {
    Final(TopicLabel),
    RefineOutlier,
    RefineClusterOne,
}

pub fn primary_route(topic: TopicId) -> PrimaryRoute {
    match topic {
        OUTLIER_TOPIC => PrimaryRoute::RefineOutlier,
        CLUSTER_ONE => PrimaryRoute::RefineClusterOne,
        0 => PrimaryRoute::Final(TopicLabel::AccessRequestAroRo),
        2 => PrimaryRoute::Final(TopicLabel::FileValidation),
        3 => PrimaryRoute::Final(TopicLabel::DeadlineExtension),
        4 => PrimaryRoute::Final(TopicLabel::UploadFailure),
        5 => PrimaryRoute::Final(TopicLabel::ApoloReporting),
        _ => PrimaryRoute::Final(TopicLabel::Unknown),
    }
}

pub fn outlier_label(sub_topic: TopicId) -> TopicLabel {
    if sub_topic == CLIENT_INSTALL_SUBTOPIC {
        TopicLabel::ClientInstall
    } else {
        TopicLabel::Outlier
    }
}

pub fn cluster_one_label(sub_topic: TopicId) -> TopicLabel {
    match sub_topic {
        0 => TopicLabel::ApplicationAccess,
        1 => TopicLabel::PasswordReset,
        2 => TopicLabel::WrongUsername,
        _ => TopicLabel::Unknown,
    }
}

/// The loaded cascade: one primary model and two sub-models.
#[derive(Clone)]
pub struct TopicClassifier {
    primary: Arc<dyn TopicModel>,
    outlier: Arc<dyn TopicModel>,
    cluster_one: Arc<dyn TopicModel>,
}

impl TopicClassifier {
    pub fn new(
        primary: Arc<dyn TopicModel>,
        outlier: Arc<dyn TopicModel>,
        cluster_one: Arc<dyn TopicModel>,
    ) -> Self {
        Self {
            primary,
            outlier,
            cluster_one,
        }
    }

    /// Load all three models. Any failure aborts: no partial cascade.
    pub fn load(store: &ModelStore, names: &ModelNames) -> Result<Self, ModelError> {
        Ok(Self::new(
            store.load(&names.primary)?,
            store.load(&names.outlier)?,
            store.load(&names.cluster_one)?,
        ))
    }

    /// Put a deadline on every inference call (`None` leaves models as they are).
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self {
            primary: TimeoutModel::wrap(self.primary, timeout),
            outlier: TimeoutModel::wrap(self.outlier, timeout),
            cluster_one: TimeoutModel::wrap(self.cluster_one, timeout),
        }
    }

    pub fn model_names(&self) -> [&str; 3] {
        [
            self.primary.name(),
            self.outlier.name(),
            self.cluster_one.name(),
        ]
    }

    /// Role, name and topic count of each model.
    pub fn describe(&self) -> [(&'static str, &str, Option<usize>); 3] {
        [
            ("primary", self.primary.name(), self.primary.topic_count()),
            ("outlier", self.outlier.name(), self.outlier.topic_count()),
            ("cluster1", self.cluster_one.name(), self.cluster_one.topic_count()),
        ]
    }

    pub fn route(&self, cleaned_text: &str) -> Result<TopicLabel, ModelError> {
        let mut labels = self.route_batch(&[cleaned_text.to_string()])?;
        Ok(labels.pop().unwrap_or(TopicLabel::Unknown))
    }

    /// Route a batch with one primary call and at most one call per sub-model.
    pub fn route_batch(&self, texts: &[String]) -> Result<Vec<TopicLabel>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let primary = self
            .primary
            .transform(texts)?
            .expect_len(self.primary.name(), texts.len())?;

        let mut labels = vec![TopicLabel::Unknown; texts.len()];
        let mut outlier_rows = Vec::new();
        let mut cluster_one_rows = Vec::new();
        for (row, &topic) in primary.topics.iter().enumerate() {
            match primary_route(topic) {
                PrimaryRoute::Final(label) => labels[row] = label,
                PrimaryRoute::RefineOutlier => outlier_rows.push(row),
                PrimaryRoute::RefineClusterOne => cluster_one_rows.push(row),
            }
        }
        tracing::debug!(
            rows = texts.len(),
            outliers = outlier_rows.len(),
            cluster_one = cluster_one_rows.len(),
            "primary topics assigned"
        );

        refine(&*self.outlier, texts, &outlier_rows, outlier_label, &mut labels)?;
        refine(&*self.cluster_one, texts, &cluster_one_rows, cluster_one_label, &mut labels)?;
        Ok(labels)
    }
}

fn refine(
    model: &dyn TopicModel,
    texts: &[String],
    rows: &[usize],
    to_label: fn(TopicId) -> TopicLabel,
    labels: &mut [TopicLabel],
) -> Result<(), ModelError> {
    if rows.is_empty() {
        return Ok(());
    }
    let subset: Vec<String> = rows.iter().map(|&row| texts[row].clone()).collect();
    let sub = model
        .transform(&subset)?
        .expect_len(model.name(), subset.len())?;
    for (&row, &topic) in rows.iter().zip(&sub.topics) {
        labels[row] = to_label(topic);
    }
    Ok(())
}
