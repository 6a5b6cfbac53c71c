use std::sync::OnceLock;

use regex::Regex;

fn script_re() -> &'static Regex {
  static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();
  SCRIPT_RE.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").unwrap())
}

/// Inner text of every `<script>` element, in document order.
///
/// A tokenizer, not a parser: scripts are matched on their tags alone.
pub fn select_scripts(html: &str) -> Vec<&str> {
  script_re()
    .captures_iter(html)
    .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    .collect()
}

/// First inline script containing `marker`.
pub fn find_script<'a>(html: &'a str, marker: &str) -> Option<&'a str> {
  select_scripts(html)
    .into_iter()
    .find(|script| script.contains(marker))
}
