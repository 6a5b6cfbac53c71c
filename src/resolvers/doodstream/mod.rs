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
  protocol::StreamDescriptor,
  resolvers::Resolver,
};

pub mod direct_url;
pub mod extractor;

const NAME: &str = "DoodStream";

pub const DOMAINS: &[&str] = &[
  "doodstream.com",
  "dood.ws",
  "dood.cx",
  "dood.sh",
  "dood.watch",
  "dood.pm",
  "dood.to",
  "dood.so",
  "dood.la",
  "dood.wf",
  "dood.yt",
];

pub struct DoodstreamResolver {
  fetcher: Arc<dyn Fetcher>,
}

impl DoodstreamResolver {
  pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
    Self { fetcher }
  }
}

fn referer_headers(page: &Url) -> ResolveResult<HeaderMap> {
  let mut headers = HeaderMap::new();
  let value =
    HeaderValue::from_str(page.as_str()).map_err(|_| ResolveError::invalid_url(page.as_str()))?;
  headers.insert(REFERER, value);
  Ok(headers)
}

#[async_trait]
impl Resolver for DoodstreamResolver {
  fn name(&self) -> &str {
    NAME
  }

  fn domains(&self) -> &[&'static str] {
    DOMAINS
  }

  async fn resolve(&self, url: &Url) -> ResolveResult<Vec<StreamDescriptor>> {
    let embed = extractor::embed_url(url);
    debug!("Doodstream: resolving {}", embed);

    let page = self.fetcher.fetch_text(&embed, HeaderMap::new()).await?;
    let pass_path = extractor::extract_pass_path(&page)?;
    let pass_url = extractor::follow_up_url(&embed, &pass_path)?;

    let stream_url =
      direct_url::compose(self.fetcher.as_ref(), &pass_url, referer_headers(&embed)?).await?;
    debug!("Doodstream: resolved {} -> {}", embed, stream_url);

    let origin = format!("https://{}/", embed.host_str().unwrap_or_default());
    Ok(vec![
      StreamDescriptor::new(NAME, stream_url).with_headers([("referer", origin)]),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::common::http::mock::MockFetcher;

  const EMBED_PAGE: &str = r#"<html><body>
<script>
  $.get('/pass_md5/21793455-88-12/x1y2z3token', function(data) { play(data); });
</script>
</body></html>"#;

  fn resolver(fetcher: Arc<MockFetcher>) -> DoodstreamResolver {
    DoodstreamResolver::new(fetcher)
  }

  #[tokio::test]
  async fn resolves_download_page_through_embed() {
    let fetcher = Arc::new(
      MockFetcher::new()
        .route("https://dood.to/e/abc123", EMBED_PAGE)
        .route(
          "https://dood.to/pass_md5/21793455-88-12/x1y2z3token",
          "https://cdn.dood.video/u5kj/abc~",
        ),
    );
    let url = Url::parse("https://dood.to/d/abc123").unwrap();

    let streams = resolver(fetcher.clone()).resolve(&url).await.unwrap();

    assert_eq!(streams.len(), 1);
    let stream = &streams[0];
    assert_eq!(stream.resolver, "DoodStream");
    assert!(
      stream
        .stream_url
        .as_str()
        .starts_with("https://cdn.dood.video/u5kj/abc~")
    );
    assert!(stream.stream_url.as_str().contains("?token=x1y2z3token&expiry="));
    assert!(stream.subtitles.is_empty());
    assert_eq!(
      stream.headers.as_ref().unwrap().get("referer").map(String::as_str),
      Some("https://dood.to/")
    );

    assert_eq!(
      fetcher.requested(),
      vec![
        "https://dood.to/e/abc123",
        "https://dood.to/pass_md5/21793455-88-12/x1y2z3token",
      ]
    );
    let pass_headers = fetcher.headers_for("https://dood.to/pass_md5/").unwrap();
    assert_eq!(pass_headers[REFERER], "https://dood.to/e/abc123");
  }

  #[tokio::test]
  async fn page_without_player_script_fails() {
    let fetcher = Arc::new(MockFetcher::new().route("https://dood.to/e/", "<html></html>"));
    let url = Url::parse("https://dood.to/e/abc123").unwrap();

    let err = resolver(fetcher).resolve(&url).await.unwrap_err();
    assert!(matches!(err, ResolveError::PatternNotFound(_)));
  }

  #[tokio::test]
  async fn network_failure_propagates() {
    let fetcher = Arc::new(MockFetcher::new());
    let url = Url::parse("https://dood.to/e/abc123").unwrap();

    let err = resolver(fetcher).resolve(&url).await.unwrap_err();
    assert!(matches!(err, ResolveError::Network(_)));
  }

  #[test]
  fn claims_dood_domains() {
    let r = resolver(Arc::new(MockFetcher::new()));
    assert!(r.can_handle(&Url::parse("https://dood.la/e/x").unwrap()));
    assert!(r.can_handle(&Url::parse("https://www.doodstream.com/d/x").unwrap()));
    assert!(!r.can_handle(&Url::parse("https://notdood.la/e/x").unwrap()));
    assert!(!r.can_handle(&Url::parse("https://rapid-cloud.co/embed-6/x").unwrap()));
  }
}
