use crate::app::ports::PageFetcher;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// `reqwest`-backed fetcher that identifies itself with a fixed User-Agent.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!(%url, "Fetching page");
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(status, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
