//! Hosted inference endpoint client.

use super::ImageClassifier;
use crate::config::{ClassifierModelConfig, ModelKind};
use crate::error::{Error, Result};
use crate::identify::RawLabel;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

/// Body shapes the inference endpoint answers with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Labels(Vec<RawLabel>),
    Failure { error: serde_json::Value },
}

/// Classifier backed by a `POST {endpoint}/{model}` inference API.
#[derive(Debug, Clone)]
pub struct InferenceClassifier {
    client: Client,
    url: String,
    model: String,
    kind: ModelKind,
    token: Option<String>,
}

impl InferenceClassifier {
    /// Create a classifier for one configured model.
    pub fn new(
        client: Client,
        endpoint: &str,
        model: &ClassifierModelConfig,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            url: format!("{}/{}", endpoint.trim_end_matches('/'), model.model),
            model: model.model.clone(),
            kind: model.kind,
            token,
        }
    }

    /// Full request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Parse an inference response body.
pub(crate) fn parse_response(url: &str, body: &[u8]) -> Result<Vec<RawLabel>> {
    let parsed: InferenceResponse =
        serde_json::from_slice(body).map_err(|e| Error::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    match parsed {
        InferenceResponse::Labels(labels) => Ok(labels),
        InferenceResponse::Failure { error } => Err(Error::MalformedResponse {
            url: url.to_string(),
            reason: format!("service error: {error}"),
        }),
    }
}

#[async_trait]
impl ImageClassifier for InferenceClassifier {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn kind(&self) -> ModelKind {
        self.kind
    }

    async fn classify(&self, image: &[u8]) -> Result<Vec<RawLabel>> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| Error::RequestFailed {
            url: self.url.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::RequestFailed {
            url: self.url.clone(),
            source: Box::new(e),
        })?;

        let labels = parse_response(&self.url, &body)?;
        tracing::debug!(model = %self.model, labels = labels.len(), "Classifier responded");
        Ok(labels)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_array() {
        let body = br#"[{"label":"rock dove","score":0.81},{"label":"pole","score":0.02}]"#;
        let labels = parse_response("u", body).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label, "rock dove");
    }

    #[test]
    fn test_parse_error_object() {
        let body = br#"{"error":"Model is currently loading","estimated_time":20.0}"#;
        let err = parse_response("u", body).unwrap_err();
        assert!(err.to_string().contains("Model is currently loading"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_response("u", b"<html>busy</html>").is_err());
        assert!(parse_response("u", br#"{"unexpected":true}"#).is_err());
    }

    #[test]
    fn test_url_joins_model() {
        let classifier = InferenceClassifier::new(
            Client::new(),
            "http://localhost:8080/models/",
            &ClassifierModelConfig::generic("google/vit-base-patch16-224"),
            None,
        );
        assert_eq!(
            classifier.url(),
            "http://localhost:8080/models/google/vit-base-patch16-224"
        );
        assert_eq!(classifier.kind(), ModelKind::Generic);
    }
}
