use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Serialize, Serializer};

use crate::protocol::language::SubtitleLanguage;

/// A playable stream produced by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
  /// Display name of the resolver that produced the stream.
  pub resolver: String,
  #[serde(serialize_with = "serialize_url")]
  pub stream_url: Url,
  /// Headers the media host expects on every request for `stream_url`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub headers: Option<BTreeMap<String, String>>,
  pub subtitles: Vec<SubtitleTrack>,
}

impl StreamDescriptor {
  pub fn new(resolver: impl Into<String>, stream_url: Url) -> Self {
    Self {
      resolver: resolver.into(),
      stream_url,
      headers: None,
      subtitles: Vec::new(),
    }
  }

  pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    self.headers = Some(
      headers
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    );
    self
  }

  pub fn with_subtitles(mut self, subtitles: Vec<SubtitleTrack>) -> Self {
    self.subtitles = subtitles;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleTrack {
  #[serde(serialize_with = "serialize_url")]
  pub url: Url,
  pub language: SubtitleLanguage,
}

fn serialize_url<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(url.as_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn descriptor_serializes_camelcase() {
    let descriptor = StreamDescriptor::new(
      "RapidCloud",
      Url::parse("https://cdn.example/master.m3u8").unwrap(),
    )
    .with_headers([("referer", "https://rapid-cloud.co/")])
    .with_subtitles(vec![SubtitleTrack {
      url: Url::parse("https://cdn.example/en.vtt").unwrap(),
      language: SubtitleLanguage::English,
    }]);

    let json = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(json["resolver"], "RapidCloud");
    assert_eq!(json["streamUrl"], "https://cdn.example/master.m3u8");
    assert_eq!(json["headers"]["referer"], "https://rapid-cloud.co/");
    assert_eq!(json["subtitles"][0]["url"], "https://cdn.example/en.vtt");
    assert_eq!(json["subtitles"][0]["language"], "en");
  }

  #[test]
  fn descriptor_without_headers_omits_key() {
    let descriptor =
      StreamDescriptor::new("DoodStream", Url::parse("https://cdn.example/v.mp4").unwrap());

    let json = serde_json::to_value(&descriptor).unwrap();
    assert!(json.get("headers").is_none());
    assert_eq!(json["subtitles"], serde_json::json!([]));
  }
}
