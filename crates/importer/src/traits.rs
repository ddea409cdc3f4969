use crate::{Result, canonical::models::RequirementTable};

/// Anything a requirement table can be read from
#[async_trait::async_trait]
pub trait RequirementSource: Send + Sync {
    /// Short label used in log lines
    fn describe(&self) -> String;

    async fn load(&self) -> Result<RequirementTable>;
}
