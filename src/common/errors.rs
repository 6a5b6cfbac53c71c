use thiserror::Error;

/// Failure kinds of a single resolution attempt.
///
/// Every stage of the pipeline surfaces one of these to its caller untouched.
/// Nothing is retried and no partial result is returned.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The expected script, marker or embedded token was not present.
  #[error("pattern not found: {0}")]
  PatternNotFound(String),

  /// A constructed string did not parse as an absolute URL.
  #[error("invalid url: {0}")]
  InvalidUrl(String),

  /// An encrypted source list was received without a usable key.
  #[error("encryption key missing")]
  EncryptionKeyMissing,

  /// Bad base64 or a blob without the salted header.
  #[error("malformed ciphertext: {0}")]
  MalformedCiphertext(String),

  /// Block cipher or padding failure.
  #[error("decryption failed: {0}")]
  DecryptionFailed(String),

  /// The source list (plain or decrypted) is not of the expected shape.
  #[error("malformed source list: {0}")]
  MalformedSourceList(String),

  #[error("network error: {0}")]
  Network(String),

  /// No registered resolver claims the host.
  #[error("no resolver for host: {0}")]
  Unsupported(String),
}

impl ResolveError {
  pub fn pattern(msg: impl Into<String>) -> Self {
    Self::PatternNotFound(msg.into())
  }

  pub fn invalid_url(url: impl Into<String>) -> Self {
    Self::InvalidUrl(url.into())
  }

  pub fn source_list(msg: impl std::fmt::Display) -> Self {
    Self::MalformedSourceList(msg.to_string())
  }
}

impl From<reqwest::Error> for ResolveError {
  fn from(e: reqwest::Error) -> Self {
    Self::Network(e.to_string())
  }
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_name_the_failure() {
    assert_eq!(
      ResolveError::pattern("pass_md5 script").to_string(),
      "pattern not found: pass_md5 script"
    );
    assert_eq!(
      ResolveError::EncryptionKeyMissing.to_string(),
      "encryption key missing"
    );
    assert_eq!(
      ResolveError::Unsupported("example.com".into()).to_string(),
      "no resolver for host: example.com"
    );
  }
}
