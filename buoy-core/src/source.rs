use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::debug;

use crate::error::{NdbcError, Result};

/// Something that can answer a GET with a text body.
///
/// [`HttpSource`] is the real implementation; tests substitute canned bodies.
#[async_trait]
pub trait TextSource: Send + Sync + Debug {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    http: Client,
}

impl HttpSource {
    pub fn new(user_agent: &str) -> Result<Self> {
        let http = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl TextSource for HttpSource {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        debug!(url, "GET");

        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let res = req.send().await?;

        let status = res.status();
        let final_url = res.url().to_string();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(NdbcError::status(status.as_u16(), final_url, &body));
        }

        Ok(body)
    }
}
