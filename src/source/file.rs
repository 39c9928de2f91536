use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::provider::GameSource;
use crate::error::LoadError;
use crate::model::{parse_payload, GameRecord};

/// Predictions exported to a local JSON file by the model pipeline.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        FileSource { path, name }
    }
}

#[async_trait]
impl GameSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<GameRecord>, LoadError> {
        debug!("Reading game predictions from {}", self.name);
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::Transport {
                source_name: self.name.clone(),
                message: e.to_string(),
            })?;
        parse_payload(&text)
    }
}
