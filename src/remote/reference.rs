//! Wikipedia REST summary lookup.

use super::ReferenceLookup;
use crate::error::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::LazyLock;

static PARENTHESIZED_BINOMIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([A-Z][a-z]+\s+[a-z]+(?:\s+var\.\s+[a-z]+)?)\)")
        .unwrap_or_else(|e| unreachable!("parenthesized binomial regex: {e}"))
});

static BINOMIAL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+\s+[a-z]+(?:\s+var\.\s+[a-z]+)?)\b")
        .unwrap_or_else(|e| unreachable!("binomial regex: {e}"))
});

/// Sentence-initial words that form false binomials ("The rock", "It is").
const STOPWORDS: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "It", "In", "Its", "They", "There", "As", "On",
    "At", "Of", "Is", "Some", "Most", "Many", "When", "While", "Both",
];

/// Pull a binomial scientific name out of free summary text.
///
/// A parenthesized binomial wins; otherwise the first capitalized two-word
/// run whose first word is not a common sentence opener.
pub fn extract_scientific_name(text: &str) -> Option<String> {
    if let Some(caps) = PARENTHESIZED_BINOMIAL.captures(text) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    BINOMIAL_IN_TEXT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|candidate| {
            candidate
                .split_whitespace()
                .next()
                .is_some_and(|first| !STOPWORDS.contains(&first))
        })
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: String,
}

/// Reference lookup against a `{endpoint}/{title}` summary API.
#[derive(Debug, Clone)]
pub struct WikipediaLookup {
    client: Client,
    endpoint: String,
}

impl WikipediaLookup {
    /// Create a lookup against `endpoint`.
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Summary URL for a page title, percent-encoded.
    pub fn summary_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| Error::MalformedResponse {
            url: self.endpoint.clone(),
            reason: format!("invalid reference endpoint: {e}"),
        })?;
        let title = name.trim().replace(' ', "_");
        url.path_segments_mut()
            .map_err(|()| Error::MalformedResponse {
                url: self.endpoint.clone(),
                reason: "reference endpoint cannot be a base URL".to_string(),
            })?
            .push(&title);
        Ok(url)
    }
}

#[async_trait]
impl ReferenceLookup for WikipediaLookup {
    async fn summary(&self, name: &str) -> Result<String> {
        let url = self.summary_url(name)?;
        let url_text = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::RequestFailed {
                url: url_text.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url_text,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::RequestFailed {
            url: url_text.clone(),
            source: Box::new(e),
        })?;

        let summary: SummaryResponse =
            serde_json::from_slice(&body).map_err(|e| Error::MalformedResponse {
                url: url_text.clone(),
                reason: e.to_string(),
            })?;

        if summary.extract.trim().is_empty() {
            return Err(Error::MalformedResponse {
                url: url_text,
                reason: "summary has no extract".to_string(),
            });
        }

        Ok(summary.extract)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_parenthesized() {
        let text = "The rock dove (Columba livia) is a member of the bird family Columbidae.";
        assert_eq!(
            extract_scientific_name(text).as_deref(),
            Some("Columba livia")
        );
    }

    #[test]
    fn test_extract_skips_sentence_openers() {
        let text = "The hoopoe is widespread. Upupa epops is its only living species.";
        assert_eq!(extract_scientific_name(text).as_deref(), Some("Upupa epops"));
    }

    #[test]
    fn test_extract_variety() {
        let text = "Known as (Pinus nigra var. laricio) in Corsica.";
        assert_eq!(
            extract_scientific_name(text).as_deref(),
            Some("Pinus nigra var. laricio")
        );
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_scientific_name("no capitalized pairs here"), None);
        assert_eq!(extract_scientific_name("It is a bird."), None);
    }

    #[test]
    fn test_summary_url_encodes_title() {
        let lookup = WikipediaLookup::new(
            Client::new(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/",
        );
        let url = lookup.summary_url("Eurasian Collared-Dove").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Eurasian_Collared-Dove"
        );

        let url = lookup.summary_url("a/b?c").unwrap();
        assert!(url.as_str().ends_with("/a%2Fb%3Fc"));
    }
}
