//! Topic routing for cleaned helpdesk complaints
//!
//! A two-level cascade over pretrained topic models:
//!
//! ```text
//!   cleaned text ──► primary model ──┬── -1 ──► outlier sub-model ──► Install / Outlier
//!                                    ├──  1 ──► cluster-1 sub-model ─► Access / Password / Username
//!                                    ├── 0,2,3,4,5 ─► fixed label
//!                                    └── other ─► Unknown
//! ```
//!
//! Models are external collaborators seen only through [`TopicModel`]. They are
//! loaded once from a [`ModelStore`] into a [`TopicClassifier`], which is passed
//! around explicitly.

pub mod aggregate;
pub mod batch;
#[cfg(feature = "http")]
pub mod http;
pub mod keyword;
pub mod label;
pub mod model;
pub mod router;
pub mod store;
pub mod timeout;

pub use aggregate::{aggregate, TopicCounts};
pub use batch::{classify_batch, classify_cleaned, BatchReport, ClassifiedRecord};
#[cfg(feature = "http")]
pub use http::HttpTopicModel;
pub use keyword::{KeywordModelFileV1, KeywordTopicModel, KeywordTopicV1, MODEL_ARTIFACT_VERSION_V1};
pub use label::{TopicLabel, UnknownLabel};
pub use model::{ModelError, TopicId, TopicModel, Transform, OUTLIER_TOPIC};
pub use router::{PrimaryRoute, TopicClassifier};
pub use store::{ModelNames, ModelStore};
pub use timeout::TimeoutModel;
