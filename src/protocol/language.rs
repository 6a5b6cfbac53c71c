use serde::{Serialize, Serializer};

/// Languages a subtitle track can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleLanguage {
  Arabic,
  Bengali,
  Chinese,
  Czech,
  Danish,
  Dutch,
  English,
  Filipino,
  Finnish,
  French,
  German,
  Greek,
  Hebrew,
  Hindi,
  Hungarian,
  Indonesian,
  Italian,
  Japanese,
  Korean,
  Malay,
  Norwegian,
  Persian,
  Polish,
  Portuguese,
  Romanian,
  Russian,
  Spanish,
  Swedish,
  Thai,
  Turkish,
  Ukrainian,
  Vietnamese,
}

impl SubtitleLanguage {
  /// ISO 639-1 code.
  pub fn code(&self) -> &'static str {
    match self {
      Self::Arabic => "ar",
      Self::Bengali => "bn",
      Self::Chinese => "zh",
      Self::Czech => "cs",
      Self::Danish => "da",
      Self::Dutch => "nl",
      Self::English => "en",
      Self::Filipino => "tl",
      Self::Finnish => "fi",
      Self::French => "fr",
      Self::German => "de",
      Self::Greek => "el",
      Self::Hebrew => "he",
      Self::Hindi => "hi",
      Self::Hungarian => "hu",
      Self::Indonesian => "id",
      Self::Italian => "it",
      Self::Japanese => "ja",
      Self::Korean => "ko",
      Self::Malay => "ms",
      Self::Norwegian => "no",
      Self::Persian => "fa",
      Self::Polish => "pl",
      Self::Portuguese => "pt",
      Self::Romanian => "ro",
      Self::Russian => "ru",
      Self::Spanish => "es",
      Self::Swedish => "sv",
      Self::Thai => "th",
      Self::Turkish => "tr",
      Self::Ukrainian => "uk",
      Self::Vietnamese => "vi",
    }
  }

  /// Looks up a track label such as `"English"`, `"Portuguese - Brazilian"`
  /// or `"es"`. Returns `None` for anything unrecognized.
  pub fn from_label(label: &str) -> Option<Self> {
    let base = label
      .split(" - ")
      .next()
      .and_then(|s| s.split(" (").next())
      .unwrap_or(label)
      .trim()
      .to_lowercase();

    let lang = match base.as_str() {
      "arabic" | "ar" => Self::Arabic,
      "bengali" | "bangla" | "bn" => Self::Bengali,
      "chinese" | "mandarin" | "zh" => Self::Chinese,
      "czech" | "cs" => Self::Czech,
      "danish" | "da" => Self::Danish,
      "dutch" | "nl" => Self::Dutch,
      "english" | "en" => Self::English,
      "filipino" | "tagalog" | "tl" => Self::Filipino,
      "finnish" | "fi" => Self::Finnish,
      "french" | "fr" => Self::French,
      "german" | "de" => Self::German,
      "greek" | "el" => Self::Greek,
      "hebrew" | "he" => Self::Hebrew,
      "hindi" | "hi" => Self::Hindi,
      "hungarian" | "hu" => Self::Hungarian,
      "indonesian" | "id" => Self::Indonesian,
      "italian" | "it" => Self::Italian,
      "japanese" | "ja" => Self::Japanese,
      "korean" | "ko" => Self::Korean,
      "malay" | "ms" => Self::Malay,
      "norwegian" | "no" => Self::Norwegian,
      "persian" | "farsi" | "fa" => Self::Persian,
      "polish" | "pl" => Self::Polish,
      "portuguese" | "pt" => Self::Portuguese,
      "romanian" | "ro" => Self::Romanian,
      "russian" | "ru" => Self::Russian,
      "spanish" | "es" => Self::Spanish,
      "swedish" | "sv" => Self::Swedish,
      "thai" | "th" => Self::Thai,
      "turkish" | "tr" => Self::Turkish,
      "ukrainian" | "uk" => Self::Ukrainian,
      "vietnamese" | "vi" => Self::Vietnamese,
      _ => return None,
    };

    Some(lang)
  }
}

impl std::fmt::Display for SubtitleLanguage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.code())
  }
}

impl Serialize for SubtitleLanguage {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.code())
  }
}
