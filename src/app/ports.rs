use async_trait::async_trait;

/// Plain GET access to the outside world. Every fetch in the pipeline goes through this port.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Returns the response for any status; `Err` only for transport failures.
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).to_string()
    }
}
