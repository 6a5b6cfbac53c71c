use reqwest::{Url, header::HeaderMap};
use tracing::trace;

use crate::common::{
  errors::{ResolveError, ResolveResult},
  http::Fetcher,
  types::{random_alphanumeric, unix_millis},
};

pub const NONCE_LEN: usize = 10;

/// Last path segment of the `/pass_md5/...` URL, echoed back as `token`.
pub fn pass_token(pass_url: &Url) -> ResolveResult<String> {
  pass_url
    .path_segments()
    .and_then(|mut segments| segments.next_back())
    .filter(|token| !token.is_empty())
    .map(str::to_string)
    .ok_or_else(|| ResolveError::pattern(format!("no token in {}", pass_url)))
}

/// `fragment + nonce + "?token=" + token + "&expiry=" + expiry`
pub fn assemble(fragment: &str, nonce: &str, token: &str, expiry: &str) -> ResolveResult<Url> {
  let raw = format!("{}{}?token={}&expiry={}", fragment, nonce, token, expiry);
  Url::parse(&raw).map_err(|_| ResolveError::invalid_url(raw))
}

/// Exchanges the pass URL for a signed, expiring stream URL.
///
/// Never cached: every call draws a new nonce and timestamp.
pub async fn compose(fetcher: &dyn Fetcher, pass_url: &Url, headers: HeaderMap) -> ResolveResult<Url> {
  let token = pass_token(pass_url)?;
  let fragment = fetcher.fetch_text(pass_url, headers).await?;
  let fragment = fragment.trim();
  trace!("Doodstream: pass fragment {}", fragment);

  assemble(
    fragment,
    &random_alphanumeric(NONCE_LEN),
    &token,
    &unix_millis().to_string(),
  )
}
