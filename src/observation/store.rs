//! Observation persistence.

use super::stats::{ObservationStats, summarize};
use super::types::Observation;
use crate::constants::storage::{IMAGE_URL_PREFIX, IMAGES_DIR, OBSERVATIONS_DIR};
use crate::error::{Error, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Storage backend for observations and their images.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Store image bytes and return a URL that refers to them.
    async fn store_image(&self, bytes: &[u8], content_type: &str) -> Result<String>;

    /// Persist an observation record.
    async fn store_observation(&self, observation: &Observation) -> Result<()>;

    /// All stored observations, newest first.
    async fn list_observations(&self) -> Result<Vec<Observation>>;

    /// One observation by id.
    async fn get_observation(&self, id: &str) -> Result<Observation>;

    /// The `limit` most recent observations, newest first.
    async fn recent_observations(&self, limit: usize) -> Result<Vec<Observation>> {
        let mut observations = self.list_observations().await?;
        observations.truncate(limit);
        Ok(observations)
    }

    /// Category counts and top locations over every stored observation.
    async fn stats(&self) -> Result<ObservationStats> {
        let observations = self.list_observations().await?;
        Ok(summarize(&observations))
    }
}

/// JSON documents and content-addressed image files under one directory.
///
/// ```text
/// <root>/images/<sha256>.<ext>
/// <root>/observations/<id>.json
/// ```
#[derive(Debug, Clone)]
pub struct FileObservationStore {
    root: PathBuf,
}

impl FileObservationStore {
    /// Store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a `store://` image URL.
    pub fn image_path(&self, image_url: &str) -> Option<PathBuf> {
        let relative = image_url.strip_prefix(IMAGE_URL_PREFIX)?;
        let file = relative.strip_prefix(IMAGES_DIR)?.strip_prefix('/')?;
        (!file.is_empty() && !file.contains(['/', '\\']))
            .then(|| self.root.join(IMAGES_DIR).join(file))
    }

    fn observation_path(&self, id: &str) -> PathBuf {
        self.root.join(OBSERVATIONS_DIR).join(format!("{id}.json"))
    }

    async fn ensure_dir(path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| Error::StoreWrite {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn read_observation(path: &Path) -> Result<Observation> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| Error::StoreRead {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_slice(&content).map_err(|source| Error::ObservationParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type.split(';').next().map(str::trim) {
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        Some("image/bmp") => "bmp",
        _ => "jpg",
    }
}

/// Ids are generated as UUIDs; anything else could escape the store directory.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[async_trait]
impl ObservationStore for FileObservationStore {
    async fn store_image(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let dir = self.root.join(IMAGES_DIR);
        Self::ensure_dir(&dir).await?;

        let digest = Sha256::digest(bytes);
        let file_name = format!("{digest:x}.{}", extension_for(content_type));
        let path = dir.join(&file_name);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "Image already stored");
        } else {
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|source| Error::StoreWrite {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(path = %path.display(), size = bytes.len(), "Stored image");
        }

        Ok(format!("{IMAGE_URL_PREFIX}{IMAGES_DIR}/{file_name}"))
    }

    async fn store_observation(&self, observation: &Observation) -> Result<()> {
        if !is_safe_id(&observation.observation_id) {
            return Err(Error::ObservationValidation {
                message: format!("invalid observation id '{}'", observation.observation_id),
            });
        }

        Self::ensure_dir(&self.root.join(OBSERVATIONS_DIR)).await?;

        let path = self.observation_path(&observation.observation_id);
        let json = serde_json::to_string_pretty(observation)
            .map_err(|source| Error::ObservationSerialize { source })?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|source| Error::StoreWrite { path, source })
    }

    async fn list_observations(&self) -> Result<Vec<Observation>> {
        let dir = self.root.join(OBSERVATIONS_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(Error::StoreRead { path: dir, source }),
        };

        let mut observations = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| Error::StoreRead {
                path: dir.clone(),
                source,
            })?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_observation(&path).await {
                Ok(observation) => observations.push(observation),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable observation"),
            }
        }

        observations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(observations)
    }

    async fn get_observation(&self, id: &str) -> Result<Observation> {
        if !is_safe_id(id) {
            return Err(Error::ObservationNotFound { id: id.to_string() });
        }

        let path = self.observation_path(id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(Error::ObservationNotFound { id: id.to_string() });
        }
        Self::read_observation(&path).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    fn observation(id: &str, hour: u32) -> Observation {
        Observation {
            observation_id: id.to_string(),
            species_name: "Columba livia".to_string(),
            common_name: Some("Rock Pigeon".to_string()),
            date_observed: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            location: "Trail 3".to_string(),
            image_url: "store://images/abc.jpg".to_string(),
            notes: None,
            ai_identification: None,
            ai_error: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_image_is_content_addressed() {
        let dir = TempDir::new().unwrap();
        let store = FileObservationStore::new(dir.path());

        let first = store.store_image(b"pixels", "image/png").await.unwrap();
        let second = store.store_image(b"pixels", "image/png").await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("store://images/"));
        assert!(first.ends_with(".png"));

        let path = store.image_path(&first).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn test_round_trip_and_ordering() {
        let dir = TempDir::new().unwrap();
        let store = FileObservationStore::new(dir.path());

        store.store_observation(&observation("aaa-1", 8)).await.unwrap();
        store.store_observation(&observation("bbb-2", 12)).await.unwrap();

        let listed = store.list_observations().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|o| o.observation_id.as_str()).collect();
        assert_eq!(ids, ["bbb-2", "aaa-1"]);

        let fetched = store.get_observation("aaa-1").await.unwrap();
        assert_eq!(fetched, observation("aaa-1", 8));
    }

    #[tokio::test]
    async fn test_recent_observations_limit() {
        let dir = TempDir::new().unwrap();
        let store = FileObservationStore::new(dir.path());

        for (id, hour) in [("aaa-1", 8), ("bbb-2", 12), ("ccc-3", 10)] {
            store.store_observation(&observation(id, hour)).await.unwrap();
        }

        let recent = store.recent_observations(2).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|o| o.observation_id.as_str()).collect();
        assert_eq!(ids, ["bbb-2", "ccc-3"]);
        assert_eq!(store.recent_observations(50).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stats_over_stored_observations() {
        let dir = TempDir::new().unwrap();
        let store = FileObservationStore::new(dir.path());

        let mut leopard = observation("ddd-4", 9);
        leopard.species_name = "Panthera pardus".to_string();
        leopard.common_name = Some("Leopard".to_string());
        leopard.location = "Ridge".to_string();
        store.store_observation(&leopard).await.unwrap();
        store.store_observation(&observation("aaa-1", 8)).await.unwrap();
        store.store_observation(&observation("bbb-2", 12)).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_observations, 3);
        assert_eq!(stats.categories.mammals, 1);
        assert_eq!(stats.categories.others, 2);
        assert_eq!(stats.top_locations[0].location, "Trail 3");
        assert_eq!(stats.top_locations[0].count, 2);
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileObservationStore::new(dir.path().join("missing"));
        assert!(store.list_observations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_or_unsafe_id() {
        let dir = TempDir::new().unwrap();
        let store = FileObservationStore::new(dir.path());

        assert!(matches!(
            store.get_observation("nope").await,
            Err(Error::ObservationNotFound { .. })
        ));
        assert!(matches!(
            store.get_observation("../etc/passwd").await,
            Err(Error::ObservationNotFound { .. })
        ));
    }

    #[test]
    fn test_image_path_rejects_foreign_urls() {
        let store = FileObservationStore::new("/data");
        assert_eq!(
            store.image_path("store://images/abc.jpg"),
            Some(PathBuf::from("/data/images/abc.jpg"))
        );
        assert!(store.image_path("https://example.org/a.jpg").is_none());
        assert!(store.image_path("store://images/../x").is_none());
    }
}
