//! Submission workflow tests against a temporary file store.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wildid::config::{Config, ModelKind};
use wildid::identify::{ClassifierChain, Identifier, RawLabel, Tier};
use wildid::observation::{FileObservationStore, ObservationForm, ObservationStore, submit};
use wildid::remote::{FetchedImage, ImageClassifier, ImageFetcher};
use wildid::{Error, Result};

struct NoFetch;

#[async_trait]
impl ImageFetcher for NoFetch {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        Err(Error::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

struct Offline;

#[async_trait]
impl ImageClassifier for Offline {
    fn model_id(&self) -> &str {
        "offline/model"
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Generic
    }

    async fn classify(&self, _image: &[u8]) -> Result<Vec<RawLabel>> {
        Err(Error::HttpStatus {
            url: "http://classifier.invalid".to_string(),
            status: 503,
        })
    }
}

struct Confident(&'static str, f32);

#[async_trait]
impl ImageClassifier for Confident {
    fn model_id(&self) -> &str {
        "confident/model"
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Generic
    }

    async fn classify(&self, _image: &[u8]) -> Result<Vec<RawLabel>> {
        Ok(vec![RawLabel::new(self.0, self.1)])
    }
}

struct Stalled;

#[async_trait]
impl ImageClassifier for Stalled {
    fn model_id(&self) -> &str {
        "stalled/model"
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Generic
    }

    async fn classify(&self, _image: &[u8]) -> Result<Vec<RawLabel>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

fn identifier(primary: Arc<dyn ImageClassifier>) -> Identifier {
    Identifier::new(
        Arc::new(NoFetch),
        ClassifierChain::new([primary, Arc::new(Offline), Arc::new(Offline)]),
    )
}

fn form(common_name: Option<&str>) -> ObservationForm {
    ObservationForm {
        species_name: "Columba livia".to_string(),
        common_name: common_name.map(str::to_string),
        date_observed: NaiveDate::from_ymd_opt(2026, 3, 14),
        location: "Trail 3".to_string(),
        notes: Some("on the footbridge".to_string()),
        image: b"jpeg bytes".to_vec(),
        image_type: "image/jpeg".to_string(),
    }
}

#[tokio::test]
async fn test_submit_with_offline_classifiers_still_stores() {
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());

    let submission = submit(
        form(Some("Rock Pigeon")),
        &identifier(Arc::new(Offline)),
        &store,
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    let stored = store
        .get_observation(&submission.observation_id)
        .await
        .unwrap();
    assert_eq!(stored, submission.observation);
    assert!(stored.ai_error.is_none());

    let identification = stored.ai_identification.unwrap();
    assert!(!identification.suggestions.is_empty());
    assert!(identification.raw_response.is_some());

    // Names the observer entered are kept.
    assert_eq!(stored.common_name.as_deref(), Some("Rock Pigeon"));
    assert_eq!(stored.species_name, "Columba livia");

    let image_path = store.image_path(&stored.image_url).unwrap();
    assert_eq!(std::fs::read(image_path).unwrap(), b"jpeg bytes");
}

#[tokio::test]
async fn test_confident_identification_fills_blank_common_name() {
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());

    let submission = submit(
        form(None),
        &identifier(Arc::new(Confident("rock dove", 0.91))),
        &store,
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert_eq!(
        submission.observation.common_name.as_deref(),
        Some("Rock Pigeon")
    );
    assert_eq!(submission.observation.species_name, "Columba livia");
}

#[tokio::test]
async fn test_deadline_overrun_stores_without_identification() {
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());

    let submission = submit(
        form(None),
        &identifier(Arc::new(Stalled)),
        &store,
        Duration::from_millis(50),
    )
    .await
    .unwrap();

    let stored = store
        .get_observation(&submission.observation_id)
        .await
        .unwrap();
    assert!(stored.ai_identification.is_none());
    assert!(stored.ai_error.unwrap().contains("timed out"));
    assert!(stored.common_name.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stalled_primary_falls_back_within_default_deadline() {
    let config = Config::default();
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());

    let chain = ClassifierChain::new([
        Arc::new(Stalled),
        Arc::new(Confident("rock dove", 0.91)),
        Arc::new(Offline),
    ])
    .with_call_timeout(Duration::from_secs(config.classifiers.timeout_secs));
    let identifier = Identifier::new(Arc::new(NoFetch), chain);

    let submission = submit(
        form(None),
        &identifier,
        &store,
        Duration::from_secs(config.pipeline.deadline_secs),
    )
    .await
    .unwrap();

    assert!(submission.observation.ai_error.is_none());
    let identification = submission.observation.ai_identification.unwrap();
    assert_eq!(identification.tier, Tier::Backup1);
    assert_eq!(
        submission.observation.common_name.as_deref(),
        Some("Rock Pigeon")
    );
}

#[tokio::test(start_paused = true)]
async fn test_all_tiers_stalled_still_reach_local_within_default_deadline() {
    let config = Config::default();
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());

    let chain = ClassifierChain::new([Arc::new(Stalled), Arc::new(Stalled), Arc::new(Stalled)])
        .with_call_timeout(Duration::from_secs(config.classifiers.timeout_secs));
    let identifier = Identifier::new(Arc::new(NoFetch), chain);

    let submission = submit(
        form(None),
        &identifier,
        &store,
        Duration::from_secs(config.pipeline.deadline_secs),
    )
    .await
    .unwrap();

    assert!(submission.observation.ai_error.is_none());
    let identification = submission.observation.ai_identification.unwrap();
    assert_eq!(identification.tier, Tier::LocalFallback);
    assert!(!identification.suggestions.is_empty());
}

#[tokio::test]
async fn test_invalid_form_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());

    let mut bad = form(None);
    bad.location = String::new();

    let err = submit(
        bad,
        &identifier(Arc::new(Offline)),
        &store,
        Duration::from_secs(5),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::ObservationValidation { .. }));
    assert!(store.list_observations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = FileObservationStore::new(dir.path());
    let identifier = identifier(Arc::new(Offline));

    let first = submit(form(None), &identifier, &store, Duration::from_secs(5))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = submit(form(None), &identifier, &store, Duration::from_secs(5))
        .await
        .unwrap();

    let listed = store.list_observations().await.unwrap();
    let ids: Vec<_> = listed.iter().map(|o| o.observation_id.as_str()).collect();
    assert_eq!(
        ids,
        [
            second.observation_id.as_str(),
            first.observation_id.as_str()
        ]
    );
}
