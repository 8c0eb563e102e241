//! Ordered classification strategies with fall-through on failure.

use super::fallback::local_suggestions;
use super::image::ImagePayload;
use super::normalize::normalize_all;
use super::types::{Suggestion, Tier};
use crate::constants::timeouts;
use crate::error::{Error, Result};
use crate::identify::RawLabel;
use crate::remote::ImageClassifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// One step of the chain.
#[derive(Clone)]
pub enum Strategy {
    /// Ask a remote classifier.
    Remote {
        /// Tier reported when this classifier answers.
        tier: Tier,
        /// The classifier to call.
        classifier: Arc<dyn ImageClassifier>,
    },
    /// Canned suggestions from local content heuristics. Never fails.
    LocalHeuristic,
}

impl Strategy {
    /// Tier this strategy reports.
    pub const fn tier(&self) -> Tier {
        match self {
            Self::Remote { tier, .. } => *tier,
            Self::LocalHeuristic => Tier::LocalFallback,
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote { tier, classifier } => f
                .debug_struct("Remote")
                .field("tier", tier)
                .field("model", &classifier.model_id())
                .finish(),
            Self::LocalHeuristic => write!(f, "LocalHeuristic"),
        }
    }
}

/// Suggestions from the first strategy that produced any, and which tier that was.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    /// Unranked suggestions.
    pub suggestions: Vec<Suggestion>,
    /// Producing tier.
    pub tier: Tier,
}

/// Primary → backup 1 → backup 2 → local heuristic.
#[derive(Debug, Clone)]
pub struct ClassifierChain {
    strategies: Vec<Strategy>,
    call_timeout: Duration,
}

impl ClassifierChain {
    /// Chain over three remote classifiers in tier order, ending in the local heuristic.
    pub fn new(classifiers: [Arc<dyn ImageClassifier>; 3]) -> Self {
        let [primary, backup_1, backup_2] = classifiers;
        Self {
            strategies: vec![
                Strategy::Remote {
                    tier: Tier::Primary,
                    classifier: primary,
                },
                Strategy::Remote {
                    tier: Tier::Backup1,
                    classifier: backup_1,
                },
                Strategy::Remote {
                    tier: Tier::Backup2,
                    classifier: backup_2,
                },
                Strategy::LocalHeuristic,
            ],
            call_timeout: Duration::from_secs(timeouts::CLASSIFIER_SECS),
        }
    }

    /// Chain with no remote tiers.
    pub fn local_only() -> Self {
        Self {
            strategies: vec![Strategy::LocalHeuristic],
            call_timeout: Duration::from_secs(timeouts::CLASSIFIER_SECS),
        }
    }

    /// Bound each remote call by `call_timeout`.
    #[must_use]
    pub const fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Strategies in the order they are tried.
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Run strategies in order until one yields suggestions.
    pub async fn run(&self, image: &ImagePayload) -> ChainOutcome {
        for strategy in &self.strategies {
            match strategy {
                Strategy::Remote { tier, classifier } => {
                    match self.call(classifier.as_ref(), &image.bytes).await {
                        Ok(raw) => {
                            let suggestions = normalize_all(&raw, classifier.kind());
                            if suggestions.is_empty() {
                                tracing::warn!(
                                    %tier,
                                    model = classifier.model_id(),
                                    raw = raw.len(),
                                    "Classifier returned no usable labels, trying next tier"
                                );
                                continue;
                            }
                            tracing::info!(
                                %tier,
                                model = classifier.model_id(),
                                kind = %classifier.kind(),
                                suggestions = suggestions.len(),
                                "Classification succeeded"
                            );
                            return ChainOutcome {
                                suggestions,
                                tier: *tier,
                            };
                        }
                        Err(e) => {
                            tracing::warn!(
                                %tier,
                                model = classifier.model_id(),
                                error = %e,
                                "Classifier failed, trying next tier"
                            );
                        }
                    }
                }
                Strategy::LocalHeuristic => return Self::local(image),
            }
        }

        Self::local(image)
    }

    async fn call(&self, classifier: &dyn ImageClassifier, bytes: &[u8]) -> Result<Vec<RawLabel>> {
        timeout(self.call_timeout, classifier.classify(bytes))
            .await
            .map_err(|_| Error::Timeout {
                operation: format!("classification with {}", classifier.model_id()),
                after: self.call_timeout,
            })?
    }

    fn local(image: &ImagePayload) -> ChainOutcome {
        tracing::info!("All remote classifiers unavailable, using local heuristics");
        ChainOutcome {
            suggestions: local_suggestions(Some(&image.data_url)),
            tier: Tier::LocalFallback,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ModelKind;
    use async_trait::async_trait;

    enum Behavior {
        Labels(Vec<RawLabel>),
        Fail,
        Hang,
    }

    struct Scripted {
        id: &'static str,
        kind: ModelKind,
        behavior: Behavior,
    }

    #[async_trait]
    impl ImageClassifier for Scripted {
        fn model_id(&self) -> &str {
            self.id
        }

        fn kind(&self) -> ModelKind {
            self.kind
        }

        async fn classify(&self, _image: &[u8]) -> Result<Vec<RawLabel>> {
            match &self.behavior {
                Behavior::Labels(labels) => Ok(labels.clone()),
                Behavior::Fail => Err(Error::HttpStatus {
                    url: self.id.to_string(),
                    status: 503,
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    fn scripted(id: &'static str, behavior: Behavior) -> Arc<dyn ImageClassifier> {
        Arc::new(Scripted {
            id,
            kind: ModelKind::Generic,
            behavior,
        })
    }

    fn payload() -> ImagePayload {
        ImagePayload::from_data_url("data:image/png;base64,aGVsbG8=").unwrap()
    }

    #[tokio::test]
    async fn test_primary_success() {
        let chain = ClassifierChain::new([
            scripted("p", Behavior::Labels(vec![RawLabel::new("rock dove", 0.8)])),
            scripted("b1", Behavior::Fail),
            scripted("b2", Behavior::Fail),
        ]);
        let outcome = chain.run(&payload()).await;
        assert_eq!(outcome.tier, Tier::Primary);
        assert_eq!(outcome.suggestions[0].name, "Rock Pigeon");
    }

    #[tokio::test]
    async fn test_falls_through_to_second_backup() {
        let chain = ClassifierChain::new([
            scripted("p", Behavior::Fail),
            scripted("b1", Behavior::Labels(vec![RawLabel::new("noise", 0.005)])),
            scripted("b2", Behavior::Labels(vec![RawLabel::new("goldfinch", 0.4)])),
        ]);
        let outcome = chain.run(&payload()).await;
        assert_eq!(outcome.tier, Tier::Backup2);
        assert_eq!(outcome.suggestions[0].name, "goldfinch");
    }

    #[tokio::test]
    async fn test_timeout_advances_tier() {
        let chain = ClassifierChain::new([
            scripted("p", Behavior::Hang),
            scripted("b1", Behavior::Labels(vec![RawLabel::new("sparrow", 0.5)])),
            scripted("b2", Behavior::Fail),
        ])
        .with_call_timeout(Duration::from_millis(20));
        let outcome = chain.run(&payload()).await;
        assert_eq!(outcome.tier, Tier::Backup1);
        assert_eq!(
            outcome.suggestions[0].scientific_name.as_deref(),
            Some("Passer domesticus")
        );
    }

    #[tokio::test]
    async fn test_all_remote_fail_uses_local() {
        let chain = ClassifierChain::new([
            scripted("p", Behavior::Fail),
            scripted("b1", Behavior::Fail),
            scripted("b2", Behavior::Labels(Vec::new())),
        ]);
        let outcome = chain.run(&payload()).await;
        assert_eq!(outcome.tier, Tier::LocalFallback);
        assert_eq!(outcome.suggestions.len(), 5);
    }

    #[test]
    fn test_strategy_order() {
        let chain = ClassifierChain::new([
            scripted("p", Behavior::Fail),
            scripted("b1", Behavior::Fail),
            scripted("b2", Behavior::Fail),
        ]);
        let tiers: Vec<_> = chain.strategies().iter().map(Strategy::tier).collect();
        assert_eq!(
            tiers,
            [Tier::Primary, Tier::Backup1, Tier::Backup2, Tier::LocalFallback]
        );
        assert_eq!(ClassifierChain::local_only().strategies().len(), 1);
    }
}
