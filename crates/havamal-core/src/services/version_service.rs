//! Post version history.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{PostVersion, parse_id};
use crate::error::DomainError;
use crate::ports::PostVersionRepository;

/// Fields of a version. Any caller-supplied creation time is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInput {
    #[serde(default)]
    pub version: String,
    pub post_id: String,
    #[serde(default)]
    pub version_number: i32,
    #[serde(default)]
    pub content: String,
}

pub struct VersionService {
    versions: Arc<dyn PostVersionRepository>,
}

impl VersionService {
    pub fn new(versions: Arc<dyn PostVersionRepository>) -> Self {
        Self { versions }
    }

    /// Record a snapshot, stamped with the current time.
    pub async fn create(&self, input: VersionInput) -> Result<PostVersion, DomainError> {
        let post_id = parse_id(&input.post_id)?;
        let version = PostVersion::new(input.version, post_id, input.version_number, input.content);
        let version = self.versions.insert(version).await?;
        tracing::info!(
            version_id = %version.id,
            post_id = %version.post_id,
            version_number = version.version_number,
            "Post version recorded"
        );
        Ok(version)
    }

    pub async fn list(&self) -> Result<Vec<PostVersion>, DomainError> {
        let mut versions = self.versions.find_all().await?;
        versions.sort_by_key(|v| v.created_at);
        Ok(versions)
    }

    pub async fn get(&self, id: &str) -> Result<PostVersion, DomainError> {
        let id = parse_id(id)?;
        self.versions
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PostVersion", id))
    }

    /// History of one post, lowest version number first.
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<PostVersion>, DomainError> {
        let post_id = parse_id(post_id)?;
        Ok(self.versions.find_by_post(post_id).await?)
    }

    /// Replace label, owner, number and content. The creation time never changes.
    pub async fn update(&self, id: &str, input: VersionInput) -> Result<PostVersion, DomainError> {
        let id = parse_id(id)?;
        let post_id = parse_id(&input.post_id)?;
        let existing = self
            .versions
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PostVersion", id))?;

        let version = PostVersion {
            version: input.version,
            post_id,
            version_number: input.version_number,
            content: input.content,
            ..existing
        };

        self.versions
            .update(version)
            .await
            .map_err(|e| DomainError::from_keyed(e, "PostVersion", id))
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id)?;
        self.versions
            .delete(id)
            .await
            .map_err(|e| DomainError::from_keyed(e, "PostVersion", id))?;
        tracing::info!(version_id = %id, "Post version deleted");
        Ok(())
    }
}
