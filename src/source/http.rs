use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::provider::GameSource;
use crate::error::LoadError;
use crate::model::{parse_payload, GameRecord};

/// Predictions served as a JSON array over HTTP(S).
pub struct HttpSource {
    http: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpSource { http, url })
    }

    fn transport(&self, e: reqwest::Error) -> LoadError {
        LoadError::Transport {
            source_name: self.url.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl GameSource for HttpSource {
    fn name(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<Vec<GameRecord>, LoadError> {
        debug!("Fetching game predictions from {}", self.url);

        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        if !resp.status().is_success() {
            return Err(LoadError::Status {
                source_name: self.url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport(e))?;
        parse_payload(&body)
    }
}
