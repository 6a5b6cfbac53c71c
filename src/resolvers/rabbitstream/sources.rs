use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{trace, warn};

use super::{crypto, key::EncryptionKey};
use crate::{
  common::errors::{ResolveError, ResolveResult},
  protocol::{SubtitleLanguage, SubtitleTrack},
};

/// A candidate stream from the `sources` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
  pub file: Url,
  /// Player type hint, e.g. `hls`.
  pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
  pub file: Option<Url>,
  pub label: Option<String>,
  pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
  pub sources: Vec<SourceEntry>,
  pub tracks: Vec<TrackEntry>,
  pub encrypted: bool,
}

#[derive(Deserialize)]
struct RawSource {
  file: String,
  #[serde(rename = "type")]
  kind: String,
}

#[derive(Deserialize)]
struct RawTrack {
  file: Option<String>,
  label: Option<String>,
  kind: String,
}

#[derive(Deserialize)]
struct RawEnvelope {
  encrypted: bool,
  tracks: Vec<RawTrack>,
  sources: Value,
}

/// The `getSources` response with `sources` still undecoded.
///
/// `encrypted` and `tracks` are available before the key is needed, so the
/// caller can skip the key fetch for plaintext responses.
pub struct SourceEnvelope {
  pub encrypted: bool,
  pub tracks: Vec<TrackEntry>,
  sources: Value,
}

impl SourceEnvelope {
  pub fn parse(body: &[u8]) -> ResolveResult<Self> {
    let raw: RawEnvelope = serde_json::from_slice(body).map_err(ResolveError::source_list)?;

    let tracks = raw
      .tracks
      .into_iter()
      .map(|t| TrackEntry {
        file: t.file.as_deref().and_then(|f| Url::parse(f).ok()),
        label: t.label,
        kind: t.kind,
      })
      .collect();

    Ok(Self {
      encrypted: raw.encrypted,
      tracks,
      sources: raw.sources,
    })
  }

  /// Decodes `sources`, decrypting them first when the response is flagged encrypted.
  pub fn decode(self, key: Option<&EncryptionKey>) -> ResolveResult<SourceResponse> {
    let raw_sources: Vec<RawSource> = if self.encrypted {
      let key = key.ok_or(ResolveError::EncryptionKeyMissing)?;
      let plain = decrypt_sources(&self.sources, key)?;
      serde_json::from_slice(&plain).map_err(ResolveError::source_list)?
    } else {
      serde_json::from_value(self.sources).map_err(ResolveError::source_list)?
    };

    let sources = raw_sources
      .into_iter()
      .map(|s| {
        let file = Url::parse(&s.file)
          .map_err(|_| ResolveError::source_list(format!("invalid source url: {}", s.file)))?;
        Ok(SourceEntry { file, kind: s.kind })
      })
      .collect::<ResolveResult<Vec<_>>>()?;

    if sources.is_empty() {
      return Err(ResolveError::source_list("empty source list"));
    }
    trace!("Rabbitstream: decoded {} sources", sources.len());

    Ok(SourceResponse {
      sources,
      tracks: self.tracks,
      encrypted: self.encrypted,
    })
  }
}

fn decrypt_sources(sources: &Value, key: &EncryptionKey) -> ResolveResult<Vec<u8>> {
  let encoded = sources.as_str().ok_or_else(|| {
    ResolveError::MalformedCiphertext("encrypted sources is not a string".to_string())
  })?;

  let blob = STANDARD
    .decode(encoded.trim())
    .map_err(|e| ResolveError::MalformedCiphertext(e.to_string()))?;

  crypto::decrypt_salted(&blob, key.as_bytes())
}

/// Parses and decodes a full `getSources` body in one step.
pub fn decode_response(body: &[u8], key: Option<&EncryptionKey>) -> ResolveResult<SourceResponse> {
  SourceEnvelope::parse(body)?.decode(key)
}

impl SourceResponse {
  /// Tracks with both a known language label and a file. Anything else is skipped.
  pub fn subtitles(&self) -> Vec<SubtitleTrack> {
    self
      .tracks
      .iter()
      .filter_map(|track| {
        let label = track.label.as_deref()?;
        let Some(language) = SubtitleLanguage::from_label(label) else {
          if track.kind == "captions" {
            warn!("Rabbitstream: skipping subtitle with unknown label '{}'", label);
          }
          return None;
        };
        let url = track.file.clone()?;
        Some(SubtitleTrack { url, language })
      })
      .collect()
  }
}
