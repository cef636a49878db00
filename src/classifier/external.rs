//! Optional out-of-process category classifier
//!
//! Speaks the `/predict` contract: POST `{"text": ...}`, expect
//! `{"category": "..."}`. Any failure degrades to "no suggestion".

use crate::models::{Category, PredictResponse};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
enum ClassificationUnavailable {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("classifier answered with status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone)]
pub struct ExternalClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl ExternalClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the remote service for a category. Never fails: transport errors,
    /// timeouts, non-2xx answers and unknown categories all yield `None`.
    pub async fn classify(&self, text: &str) -> Option<Category> {
        match self.request(text).await {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!("External classification unavailable: {}", e);
                None
            }
        }
    }

    async fn request(&self, text: &str) -> Result<Option<Category>, ClassificationUnavailable> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassificationUnavailable::Status(response.status()));
        }

        let body: PredictResponse = response.json().await?;
        let category = body.category.as_deref().and_then(Category::parse);
        if category.is_none() {
            tracing::debug!("Classifier returned no usable category: {:?}", body.category);
        }
        Ok(category)
    }
}
