use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
  Url,
  header::{HeaderMap, HeaderValue, REFERER},
};
use tracing::debug;

use crate::{
  common::{
    errors::{ResolveError, ResolveResult},
    http::Fetcher,
  },
  configs::RabbitstreamConfig,
  protocol::StreamDescriptor,
  resolvers::Resolver,
};

pub mod crypto;
pub mod key;
pub mod sources;

use self::{key::EncryptionKey, sources::SourceEnvelope};

const NAME: &str = "Rabbitstream";
/// Name the streams are reported under; the player is branded RapidCloud.
const STREAM_RESOLVER_NAME: &str = "RapidCloud";

pub const DOMAINS: &[&str] = &["rabbitstream.net", "rapid-cloud.co", "megacloud.tv"];

/// Query parameters the embed player is normally opened with.
const PLAYER_PARAMS: &[(&str, &str)] = &[("autoPlay", "1"), ("oa", "1"), ("asi", "1")];

pub struct RabbitstreamResolver {
  fetcher: Arc<dyn Fetcher>,
  config: RabbitstreamConfig,
  user_agent: String,
}

impl RabbitstreamResolver {
  pub fn new(fetcher: Arc<dyn Fetcher>, config: RabbitstreamConfig, user_agent: String) -> Self {
    Self {
      fetcher,
      config,
      user_agent,
    }
  }

  fn sources_url(&self, id: &str) -> ResolveResult<Url> {
    let mut url = Url::parse(&self.config.sources_endpoint)
      .map_err(|_| ResolveError::invalid_url(self.config.sources_endpoint.as_str()))?;
    url.query_pairs_mut().append_pair("id", id);
    Ok(url)
  }

  fn stream_headers(&self) -> [(&'static str, String); 3] {
    [
      ("origin", self.config.origin.clone()),
      ("referer", self.config.origin.clone()),
      ("user-agent", self.user_agent.clone()),
    ]
  }
}

/// Sets the player parameters, replacing any values already present.
pub fn with_player_params(url: &Url) -> Url {
  let kept: Vec<(String, String)> = url
    .query_pairs()
    .filter(|(k, _)| !PLAYER_PARAMS.iter().any(|(p, _)| *p == k.as_ref()))
    .map(|(k, v)| (k.into_owned(), v.into_owned()))
    .collect();

  let mut out = url.clone();
  {
    let mut query = out.query_pairs_mut();
    query.clear();
    query.extend_pairs(kept);
    query.extend_pairs(PLAYER_PARAMS.iter().copied());
  }
  out
}

/// The embed id is the last path segment: `/embed-6/<id>`.
pub fn embed_id(url: &Url) -> ResolveResult<String> {
  url
    .path_segments()
    .and_then(|mut segments| segments.next_back())
    .filter(|id| !id.is_empty())
    .map(str::to_string)
    .ok_or_else(|| ResolveError::pattern(format!("no embed id in {}", url)))
}

fn ajax_headers(page: &Url) -> ResolveResult<HeaderMap> {
  let mut headers = HeaderMap::new();
  headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
  headers.insert(
    REFERER,
    HeaderValue::from_str(page.as_str()).map_err(|_| ResolveError::invalid_url(page.as_str()))?,
  );
  Ok(headers)
}

#[async_trait]
impl Resolver for RabbitstreamResolver {
  fn name(&self) -> &str {
    NAME
  }

  fn domains(&self) -> &[&'static str] {
    DOMAINS
  }

  async fn resolve(&self, url: &Url) -> ResolveResult<Vec<StreamDescriptor>> {
    let page = with_player_params(url);
    let id = embed_id(&page)?;
    let sources_url = self.sources_url(&id)?;
    debug!("Rabbitstream: fetching sources for {}", id);

    let body = self
      .fetcher
      .fetch_bytes(&sources_url, ajax_headers(&page)?)
      .await?;
    let envelope = SourceEnvelope::parse(&body)?;

    // call-scoped, never shared between concurrent resolutions
    let key: Option<EncryptionKey> = if envelope.encrypted {
      Some(key::fetch_key(self.fetcher.as_ref(), &self.config.key_url).await?)
    } else {
      None
    };

    let response = envelope.decode(key.as_ref())?;
    let subtitles = response.subtitles();
    debug!(
      "Rabbitstream: {} sources, {} subtitles for {}",
      response.sources.len(),
      subtitles.len(),
      id
    );

    let headers = self.stream_headers();
    Ok(
      response
        .sources
        .into_iter()
        .map(|source| {
          StreamDescriptor::new(STREAM_RESOLVER_NAME, source.file)
            .with_headers(headers.clone())
            .with_subtitles(subtitles.clone())
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::common::http::mock::MockFetcher;

  const EMBED: &str = "https://rapid-cloud.co/embed-6/XCk0Kd6dyHWj?vast=1";
  const SOURCES: &str = "https://rapid-cloud.co/ajax/embed-6/getSources";
  const KEY_URL: &str = "https://keys.example/key.txt";

  const PLAIN: &str =
    r#"{"encrypted": false, "sources": [{"file": "https://x/a.m3u8", "type": "hls"}], "tracks": []}"#;
  const ENCRYPTED: &str = r#"{"encrypted": true, "sources": "U2FsdGVkX19zYWx0c2FsdMKbpg9ySXzrXLaa+2xBBYnhNcOGVKBU8LMkhLNzR6qFAAlx91yxxuQM7s/ebSY5RQ==", "tracks": []}"#;

  fn resolver(fetcher: Arc<MockFetcher>) -> RabbitstreamResolver {
    RabbitstreamResolver::new(
      fetcher,
      RabbitstreamConfig {
        key_url: KEY_URL.to_string(),
        ..Default::default()
      },
      "test-agent".to_string(),
    )
  }

  async fn resolve(fetcher: Arc<MockFetcher>) -> ResolveResult<Vec<StreamDescriptor>> {
    resolver(fetcher)
      .resolve(&Url::parse(EMBED).unwrap())
      .await
  }

  #[test]
  fn player_params_replace_existing() {
    let url = Url::parse("https://rapid-cloud.co/embed-6/abc?vast=1&autoPlay=0&oa=0").unwrap();
    let with = with_player_params(&url);
    assert_eq!(
      with.as_str(),
      "https://rapid-cloud.co/embed-6/abc?vast=1&autoPlay=1&oa=1&asi=1"
    );
    assert_eq!(with_player_params(&with), with);
  }

  #[test]
  fn embed_id_is_last_segment() {
    let url = Url::parse(EMBED).unwrap();
    assert_eq!(embed_id(&url).unwrap(), "XCk0Kd6dyHWj");

    let bare = Url::parse("https://rapid-cloud.co/").unwrap();
    assert!(matches!(
      embed_id(&bare),
      Err(ResolveError::PatternNotFound(_))
    ));
  }

  #[tokio::test]
  async fn plaintext_sources_resolve_without_key() {
    let fetcher = Arc::new(MockFetcher::new().route(SOURCES, PLAIN));

    let streams = resolve(fetcher.clone()).await.unwrap();

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].resolver, "RapidCloud");
    assert_eq!(streams[0].stream_url.as_str(), "https://x/a.m3u8");
    assert!(streams[0].subtitles.is_empty());

    let headers = streams[0].headers.as_ref().unwrap();
    assert_eq!(headers["origin"], "https://rapid-cloud.co/");
    assert_eq!(headers["referer"], "https://rapid-cloud.co/");
    assert_eq!(headers["user-agent"], "test-agent");

    let requested = fetcher.requested();
    assert_eq!(requested.len(), 1);
    assert_eq!(
      requested[0],
      "https://rapid-cloud.co/ajax/embed-6/getSources?id=XCk0Kd6dyHWj"
    );
    let ajax = fetcher.headers_for(SOURCES).unwrap();
    assert_eq!(ajax["x-requested-with"], "XMLHttpRequest");
    assert_eq!(
      ajax[REFERER],
      "https://rapid-cloud.co/embed-6/XCk0Kd6dyHWj?vast=1&autoPlay=1&oa=1&asi=1"
    );
  }

  #[tokio::test]
  async fn encrypted_sources_match_plaintext_result() {
    let plain = resolve(Arc::new(MockFetcher::new().route(SOURCES, PLAIN)))
      .await
      .unwrap();

    let fetcher = Arc::new(
      MockFetcher::new()
        .route(SOURCES, ENCRYPTED)
        .route(KEY_URL, "the-quick-key"),
    );
    let encrypted = resolve(fetcher.clone()).await.unwrap();

    assert_eq!(encrypted, plain);
    assert!(fetcher.requested()[1].starts_with("https://keys.example/key.txt?ts="));
  }

  #[tokio::test]
  async fn encrypted_with_blank_key_is_missing() {
    let fetcher = Arc::new(
      MockFetcher::new()
        .route(SOURCES, ENCRYPTED)
        .route(KEY_URL, "\n"),
    );

    assert!(matches!(
      resolve(fetcher).await,
      Err(ResolveError::EncryptionKeyMissing)
    ));
  }

  #[tokio::test]
  async fn unreachable_key_server_is_network_error() {
    let fetcher = Arc::new(MockFetcher::new().route(SOURCES, ENCRYPTED));

    assert!(matches!(
      resolve(fetcher).await,
      Err(ResolveError::Network(_))
    ));
  }

  #[tokio::test]
  async fn wrong_key_never_yields_streams() {
    let fetcher = Arc::new(
      MockFetcher::new()
        .route(SOURCES, ENCRYPTED)
        .route(KEY_URL, "stale-key"),
    );

    match resolve(fetcher).await {
      Err(ResolveError::DecryptionFailed(_)) | Err(ResolveError::MalformedSourceList(_)) => {}
      other => panic!("expected decrypt failure, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn every_source_carries_subtitles() {
    let body = r#"{
      "encrypted": false,
      "sources": [
        {"file": "https://x/a.m3u8", "type": "hls"},
        {"file": "https://y/a.m3u8", "type": "hls"}
      ],
      "tracks": [
        {"file": "https://x/en.vtt", "label": "English", "kind": "captions"},
        {"file": "https://x/thumbs.vtt", "kind": "thumbnails"}
      ]
    }"#;
    let fetcher = Arc::new(MockFetcher::new().route(SOURCES, body));

    let streams = resolve(fetcher).await.unwrap();
    assert_eq!(streams.len(), 2);
    for stream in &streams {
      assert_eq!(stream.subtitles.len(), 1);
      assert_eq!(stream.subtitles[0].url.as_str(), "https://x/en.vtt");
    }
  }

  #[test]
  fn claims_rabbitstream_domains() {
    let r = resolver(Arc::new(MockFetcher::new()));
    assert!(r.can_handle(&Url::parse("https://megacloud.tv/embed-2/e-1/abc").unwrap()));
    assert!(r.can_handle(&Url::parse("https://RABBITSTREAM.net/embed-4/abc").unwrap()));
    assert!(!r.can_handle(&Url::parse("https://dood.to/e/abc").unwrap()));
  }
}
