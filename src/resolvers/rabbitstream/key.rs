use reqwest::{Url, header::HeaderMap};
use tracing::debug;

use crate::common::{
  errors::{ResolveError, ResolveResult},
  http::Fetcher,
  types::unix_secs,
};

/// Secret used to decrypt one source list.
///
/// Fetched per resolution and passed to the decoder by value, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey(Vec<u8>);

impl EncryptionKey {
  /// Fails with [`ResolveError::EncryptionKeyMissing`] on empty input.
  pub fn new(bytes: impl Into<Vec<u8>>) -> ResolveResult<Self> {
    let bytes = bytes.into();
    if bytes.is_empty() {
      return Err(ResolveError::EncryptionKeyMissing);
    }
    Ok(Self(bytes))
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

impl std::fmt::Debug for EncryptionKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "EncryptionKey({} bytes)", self.0.len())
  }
}

/// Downloads the current key. A `ts` query parameter defeats CDN caching.
pub async fn fetch_key(fetcher: &dyn Fetcher, key_url: &str) -> ResolveResult<EncryptionKey> {
  let mut url = Url::parse(key_url).map_err(|_| ResolveError::invalid_url(key_url))?;
  url
    .query_pairs_mut()
    .append_pair("ts", &unix_secs().to_string());

  let text = fetcher.fetch_text(&url, HeaderMap::new()).await?;
  let key = EncryptionKey::new(text.trim().as_bytes())?;
  debug!("Rabbitstream: fetched decryption key ({} bytes)", key.as_bytes().len());

  Ok(key)
}
