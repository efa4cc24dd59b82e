//! Remote topic models served over HTTP
//!
//! Protocol:
//! - `GET  {base}/models/{name}`            → 200 when the model is loaded
//! - `POST {base}/models/{name}/transform`  `{"documents": [..]}`
//!   → `{"topics": [..], "probabilities": [..]}`

use serde::Serialize;
use std::time::Duration;

use crate::model::{ModelError, TopicModel, Transform};

#[derive(Serialize)]
struct TransformRequest<'a> {
    documents: &'a [String],
}

pub struct HttpTopicModel {
    client: reqwest::blocking::Client,
    base_url: String,
    name: String,
}

impl HttpTopicModel {
    /// Build a client and check the server knows `name`.
    pub fn connect(base_url: &str, name: &str, timeout: Option<Duration>) -> Result<Self, ModelError> {
        let http_error = |message: String| ModelError::Http {
            model: name.to_string(),
            message,
        };

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| http_error(format!("failed to build http client: {e}")))?;

        let model = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            name: name.to_string(),
        };

        let url = model.url("");
        let resp = model
            .client
            .get(&url)
            .send()
            .map_err(|e| http_error(format!("failed to reach model server at {url} ({e})")))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ModelError::NotFound {
                model: name.to_string(),
                location: model.base_url.clone(),
            });
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(http_error(format!("{status}: {text}")));
        }
        Ok(model)
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/models/{}{suffix}", self.base_url, self.name)
    }

    fn http_error(&self, message: String) -> ModelError {
        ModelError::Http {
            model: self.name.clone(),
            message,
        }
    }
}

impl TopicModel for HttpTopicModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, documents: &[String]) -> Result<Transform, ModelError> {
        let url = self.url("/transform");
        let resp = self
            .client
            .post(&url)
            .json(&TransformRequest { documents })
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    self.http_error(format!("request to {url} timed out"))
                } else {
                    self.http_error(format!("request to {url} failed ({e})"))
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(self.http_error(format!("{status}: {text}")));
        }

        let transform: Transform = resp
            .json()
            .map_err(|e| self.http_error(format!("invalid transform response ({e})")))?;
        transform.expect_len(&self.name, documents.len())
    }
}
