pub mod file;
pub mod http;
pub mod provider;

pub use file::FileSource;
pub use http::HttpSource;
pub use provider::GameSource;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DataSourceSpec;

/// Build the configured data source.
pub fn build_source(kind: &DataSourceSpec, timeout: Duration) -> Result<Arc<dyn GameSource>> {
    let source: Arc<dyn GameSource> = match kind {
        DataSourceSpec::Http(url) => Arc::new(HttpSource::new(url.clone(), timeout)?),
        DataSourceSpec::File(path) => Arc::new(FileSource::new(path.clone())),
    };
    Ok(source)
}
