use crate::domain::model::CatalogPage;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CatalogError, Result};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

/// Fetches the catalog page with a single GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` of `None` means the request may block indefinitely.
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.timeout(), config.user_agent())
    }

    pub async fn fetch_page(&self, url: &str) -> Result<CatalogPage> {
        tracing::debug!("Requesting catalog page: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);
        if !status.is_success() {
            return Err(CatalogError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        tracing::debug!("Catalog page downloaded ({} bytes)", body.len());

        Ok(CatalogPage {
            url: url.to_string(),
            body,
            fetched_at: Utc::now(),
        })
    }
}
