use serde::{Deserialize, Serialize};

/// Toggles for each hosting resolver.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResolversConfig {
  #[serde(default = "enabled")]
  pub doodstream: bool,
  #[serde(default = "enabled")]
  pub rabbitstream: bool,
}

fn enabled() -> bool {
  true
}

impl Default for ResolversConfig {
  fn default() -> Self {
    Self {
      doodstream: true,
      rabbitstream: true,
    }
  }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RabbitstreamConfig {
  /// Ajax endpoint answering `?id=<embed id>` with the source list.
  #[serde(default = "default_sources_endpoint")]
  pub sources_endpoint: String,
  /// Plain-text endpoint distributing the source list secret.
  #[serde(default = "default_key_url")]
  pub key_url: String,
  /// Sent as `origin` and `referer` with every resolved stream.
  #[serde(default = "default_origin")]
  pub origin: String,
}

fn default_sources_endpoint() -> String {
  "https://rapid-cloud.co/ajax/embed-6/getSources".to_string()
}

fn default_key_url() -> String {
  "https://raw.githubusercontent.com/enimax-anime/key/e0/key.txt".to_string()
}

fn default_origin() -> String {
  "https://rapid-cloud.co/".to_string()
}

impl Default for RabbitstreamConfig {
  fn default() -> Self {
    Self {
      sources_endpoint: default_sources_endpoint(),
      key_url: default_key_url(),
      origin: default_origin(),
    }
  }
}
