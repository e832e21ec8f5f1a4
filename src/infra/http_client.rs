use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use std::time::Duration;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ScraperError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
        let resp = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| e.to_string())?.to_vec();
        Ok(HttpGetResult { status, bytes })
    }
}
