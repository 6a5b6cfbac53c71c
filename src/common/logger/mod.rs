use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub mod formatter;

pub use formatter::*;

use crate::configs::Config;

/// Builds the filter directive from the logging section of the config.
///
/// `reqwest`/`hyper` internals are capped at `warn` so resolver traces stay readable.
pub fn filter_directive(config: &Config) -> String {
  let log_level = config
    .logging
    .as_ref()
    .and_then(|l| l.level.as_deref())
    .unwrap_or("info");

  let filters = config
    .logging
    .as_ref()
    .and_then(|l| l.filters.as_deref())
    .unwrap_or("");

  if filters.is_empty() {
    format!("{},hyper=warn,reqwest=warn", log_level)
  } else {
    format!("{},hyper=warn,reqwest=warn,{}", log_level, filters)
  }
}

pub fn init(config: &Config) {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

  // stdout carries the JSON output, logs go to stderr
  let stderr_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .event_format(CustomFormatter::new(true))
    .with_ansi(true);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(stderr_layer)
    .init();
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::configs::LoggingConfig;

  #[test]
  fn directive_defaults_to_info() {
    assert_eq!(
      filter_directive(&Config::default()),
      "info,hyper=warn,reqwest=warn"
    );
  }

  #[test]
  fn directive_appends_filters() {
    let config = Config {
      logging: Some(LoggingConfig {
        level: Some("debug".into()),
        filters: Some("resolvelink::resolvers=trace".into()),
      }),
      ..Default::default()
    };

    assert_eq!(
      filter_directive(&config),
      "debug,hyper=warn,reqwest=warn,resolvelink::resolvers=trace"
    );
  }
}
