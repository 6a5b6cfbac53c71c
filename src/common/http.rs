use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header::HeaderMap};
use tracing::trace;

use crate::{
  common::errors::{ResolveError, ResolveResult},
  configs::HttpConfig,
};

pub struct HttpClient;

impl HttpClient {
  pub fn new(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
      .user_agent(config.user_agent.clone())
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
  }
}

/// Page and byte fetching used by the resolvers.
///
/// Any transport failure or non-success status is a [`ResolveError::Network`].
#[async_trait]
pub trait Fetcher: Send + Sync {
  async fn fetch_bytes(&self, url: &Url, headers: HeaderMap) -> ResolveResult<Vec<u8>>;

  async fn fetch_text(&self, url: &Url, headers: HeaderMap) -> ResolveResult<String> {
    let bytes = self.fetch_bytes(url, headers).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }
}

pub struct ReqwestFetcher {
  client: Client,
}

impl ReqwestFetcher {
  pub fn new(client: Client) -> Self {
    Self { client }
  }

  pub fn from_config(config: &HttpConfig) -> ResolveResult<Self> {
    Ok(Self::new(HttpClient::new(config)?))
  }

  async fn send(&self, url: &Url, headers: HeaderMap) -> ResolveResult<reqwest::Response> {
    trace!("GET {}", url);
    let resp = self.client.get(url.clone()).headers(headers).send().await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(ResolveError::Network(format!("HTTP {} for {}", status, url)));
    }

    Ok(resp)
  }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
  async fn fetch_bytes(&self, url: &Url, headers: HeaderMap) -> ResolveResult<Vec<u8>> {
    let resp = self.send(url, headers).await?;
    Ok(resp.bytes().await?.to_vec())
  }

  async fn fetch_text(&self, url: &Url, headers: HeaderMap) -> ResolveResult<String> {
    let resp = self.send(url, headers).await?;
    Ok(resp.text().await?)
  }
}
