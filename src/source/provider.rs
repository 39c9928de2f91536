use async_trait::async_trait;

use crate::error::LoadError;
use crate::model::GameRecord;

/// Trait that every game-prediction data source must implement.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Fetch the full set of game predictions.
    async fn fetch(&self) -> Result<Vec<GameRecord>, LoadError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
