use std::{process::ExitCode, sync::Arc};

use futures::future::join_all;
use reqwest::Url;
use resolvelink::{
  ResolveError, ResolveResult, ResolverManager, StreamDescriptor,
  common::{http::ReqwestFetcher, logger},
  configs::Config,
};
use serde_json::json;
use tracing::{error, info, warn};

async fn resolve_one(manager: &ResolverManager, raw: &str) -> ResolveResult<Vec<StreamDescriptor>> {
  let url = Url::parse(raw).map_err(|_| ResolveError::invalid_url(raw))?;
  manager.resolve(&url).await
}

#[tokio::main]
async fn main() -> ExitCode {
  let (config, config_err) = match Config::load() {
    Ok(config) => (config, None),
    Err(e) => (Config::default(), Some(e)),
  };
  logger::init(&config);
  if let Some(e) = config_err {
    warn!("Using default configuration: {}", e);
  }

  let urls: Vec<String> = std::env::args().skip(1).collect();
  if urls.is_empty() {
    eprintln!("usage: resolvelink <page-url>...");
    return ExitCode::from(2);
  }

  let fetcher = match ReqwestFetcher::from_config(&config.http) {
    Ok(fetcher) => Arc::new(fetcher),
    Err(e) => {
      error!("Failed to build HTTP client: {}", e);
      return ExitCode::FAILURE;
    }
  };
  let manager = ResolverManager::new(&config, fetcher);
  info!("Resolvers: {}", manager.resolver_names().join(", "));

  let results = join_all(urls.iter().map(|raw| resolve_one(&manager, raw))).await;

  let mut failed = false;
  let mut output = Vec::with_capacity(urls.len());
  for (raw, result) in urls.iter().zip(results) {
    match result {
      Ok(streams) => output.push(json!({ "url": raw, "streams": streams })),
      Err(e) => {
        error!("Failed to resolve {}: {}", raw, e);
        output.push(json!({ "url": raw, "error": e.to_string() }));
        failed = true;
      }
    }
  }

  match serde_json::to_string_pretty(&output) {
    Ok(s) => println!("{}", s),
    Err(e) => {
      error!("Failed to serialize output: {}", e);
      return ExitCode::FAILURE;
    }
  }

  if failed {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}
