//! Model store
//!
//! Models are loaded by name, once per process:
//! - `Directory`: `<dir>/<name>.json` keyword-weight artifacts
//! - `Http` (feature `http`): a model server exposing `/models/<name>`
//!
//! A load that fails on I/O is retried once after a short backoff. Any other
//! failure, or a second I/O failure, is returned to the caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::keyword::KeywordTopicModel;
use crate::model::{ModelError, TopicModel};

pub const PRIMARY_MODEL: &str = "bertopic_utama";
pub const CLUSTER_ONE_MODEL: &str = "sub_topic_1";
pub const OUTLIER_MODEL: &str = "sub_topic_min1";

pub const LOAD_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Names of the three models making up the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNames {
    pub primary: String,
    /// Refines the primary model's outlier cluster (`-1`).
    pub outlier: String,
    /// Refines primary cluster `1`.
    pub cluster_one: String,
}

impl Default for ModelNames {
    fn default() -> Self {
        Self {
            primary: PRIMARY_MODEL.to_string(),
            outlier: OUTLIER_MODEL.to_string(),
            cluster_one: CLUSTER_ONE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ModelStore {
    Directory(PathBuf),
    #[cfg(feature = "http")]
    Http {
        base_url: String,
        timeout: Option<Duration>,
    },
}

impl ModelStore {
    pub fn location(&self) -> String {
        match self {
            ModelStore::Directory(dir) => dir.display().to_string(),
            #[cfg(feature = "http")]
            ModelStore::Http { base_url, .. } => base_url.clone(),
        }
    }

    pub fn load(&self, name: &str) -> Result<Arc<dyn TopicModel>, ModelError> {
        self.load_with_backoff(name, LOAD_RETRY_BACKOFF)
    }

    pub fn load_with_backoff(
        &self,
        name: &str,
        backoff: Duration,
    ) -> Result<Arc<dyn TopicModel>, ModelError> {
        retry_once(name, backoff, || self.load_once(name))
    }

    fn load_once(&self, name: &str) -> Result<Arc<dyn TopicModel>, ModelError> {
        match self {
            ModelStore::Directory(dir) => {
                let path = dir.join(format!("{name}.json"));
                if !path.is_file() {
                    return Err(ModelError::NotFound {
                        model: name.to_string(),
                        location: dir.display().to_string(),
                    });
                }
                let model = KeywordTopicModel::load(&path, name)?;
                tracing::info!(
                    model = name,
                    topics = model.topic_count().unwrap_or(0),
                    path = %path.display(),
                    "loaded model"
                );
                Ok(Arc::new(model))
            }
            #[cfg(feature = "http")]
            ModelStore::Http { base_url, timeout } => {
                let model = crate::http::HttpTopicModel::connect(base_url, name, *timeout)?;
                tracing::info!(model = name, base_url = base_url.as_str(), "connected to model");
                Ok(Arc::new(model))
            }
        }
    }
}

/// Run `attempt`, and once more after `backoff` if the first error is retryable.
pub(crate) fn retry_once<T, F>(
    name: &str,
    backoff: Duration,
    mut attempt: F,
) -> Result<T, ModelError>
where
    F: FnMut() -> Result<T, ModelError>,
{
    match attempt() {
        Err(e) if e.is_retryable() => {
            tracing::warn!(model = name, error = %e, "model load failed, retrying once");
            std::thread::sleep(backoff);
            attempt()
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{"version": 1, "name": "sub_topic_1", "topics": [{"id": 0, "words": [["akses", 1.0]]}]}"#;

    #[test]
    fn loads_named_artifact_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sub_topic_1.json"), ARTIFACT).unwrap();

        let store = ModelStore::Directory(dir.path().to_path_buf());
        let model = store.load("sub_topic_1").unwrap();
        assert_eq!(model.name(), "sub_topic_1");
        let out = model.transform(&["akses".to_string()]).unwrap();
        assert_eq!(out.topics, vec![0]);
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::Directory(dir.path().to_path_buf());
        let err = store
            .load_with_backoff("bertopic_utama", Duration::ZERO)
            .err()
            .unwrap();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn corrupt_artifact_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.json"), "{").unwrap();
        let store = ModelStore::Directory(dir.path().to_path_buf());
        let err = store.load_with_backoff("m", Duration::ZERO).err().unwrap();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    fn io_error() -> ModelError {
        ModelError::Io {
            path: "models/m.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Interrupted, "flaky disk"),
        }
    }

    #[test]
    fn retryable_failure_then_success() {
        let mut attempts = 0;
        let out = retry_once("m", Duration::ZERO, || {
            attempts += 1;
            if attempts == 1 {
                Err(io_error())
            } else {
                Ok(7)
            }
        });
        assert_eq!(out.unwrap(), 7);
        assert_eq!(attempts, 2);
    }

    #[test]
    fn second_failure_propagates() {
        let mut attempts = 0;
        let err = retry_once("m", Duration::ZERO, || -> Result<(), ModelError> {
            attempts += 1;
            Err(ModelError::Http {
                model: "m".to_string(),
                message: format!("attempt {attempts} refused"),
            })
        })
        .unwrap_err();
        assert_eq!(attempts, 2);
        assert!(err.to_string().contains("attempt 2 refused"));
    }

    #[test]
    fn non_retryable_failure_is_not_retried() {
        let mut attempts = 0;
        let err = retry_once("m", Duration::ZERO, || -> Result<(), ModelError> {
            attempts += 1;
            Err(ModelError::NotFound {
                model: "m".to_string(),
                location: "models".to_string(),
            })
        })
        .unwrap_err();
        assert_eq!(attempts, 1);
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn default_names_match_published_models() {
        let names = ModelNames::default();
        assert_eq!(names.primary, "bertopic_utama");
        assert_eq!(names.outlier, "sub_topic_min1");
        assert_eq!(names.cluster_one, "sub_topic_1");
    }
}
