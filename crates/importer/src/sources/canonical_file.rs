use crate::{Result, RequirementSource, canonical::models::RequirementTable};
use std::path::PathBuf;

/// A requirement table already in the interchange JSON format
pub struct CanonicalFileSource {
    path: PathBuf,
}

impl CanonicalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl RequirementSource for CanonicalFileSource {
    fn describe(&self) -> String {
        format!("canonical JSON {}", self.path.display())
    }

    async fn load(&self) -> Result<RequirementTable> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&json)?)
    }
}
