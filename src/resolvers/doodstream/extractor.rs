use std::sync::OnceLock;

use reqwest::Url;

use crate::{
  common::errors::{ResolveError, ResolveResult},
  resolvers::html,
};

/// Substring identifying the player script on an embed page.
pub const PASS_MARKER: &str = "pass_md5";

fn pass_path_re() -> &'static regex::Regex {
  static PASS_PATH_RE: OnceLock<regex::Regex> = OnceLock::new();
  PASS_PATH_RE.get_or_init(|| regex::Regex::new(r"\$\.get\('(/pass_md5[^']+)").unwrap())
}

/// Rewrites a `/d/<id>` download page to its `/e/<id>` embed page.
///
/// Only the embed variant carries the player script. Other URLs are returned unchanged.
pub fn embed_url(url: &Url) -> Url {
  let mut segments: Vec<&str> = match url.path_segments() {
    Some(s) => s.collect(),
    None => return url.clone(),
  };

  if segments.first() != Some(&"d") {
    return url.clone();
  }
  segments[0] = "e";

  let mut embed = url.clone();
  embed.set_path(&format!("/{}", segments.join("/")));
  embed
}

/// Pulls the `/pass_md5/...` path out of the first script mentioning it.
pub fn extract_pass_path(page: &str) -> ResolveResult<String> {
  let script = html::find_script(page, PASS_MARKER)
    .ok_or_else(|| ResolveError::pattern("no script contains pass_md5"))?;

  pass_path_re()
    .captures(script)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().to_string())
    .ok_or_else(|| ResolveError::pattern("pass_md5 request not found in player script"))
}

/// Absolute URL of `path` on the host that served `page_url`.
pub fn follow_up_url(page_url: &Url, path: &str) -> ResolveResult<Url> {
  let host = page_url.host_str().unwrap_or_default();
  let raw = format!("https://{}{}", host, path);

  Url::parse(&raw).map_err(|_| ResolveError::invalid_url(raw))
}
