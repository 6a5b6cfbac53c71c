use std::sync::Arc;

use reqwest::Url;

use super::{
  doodstream::DoodstreamResolver,
  plugin::{BoxedResolver, Resolver},
  rabbitstream::RabbitstreamResolver,
};
use crate::{
  common::{
    errors::{ResolveError, ResolveResult},
    http::Fetcher,
  },
  protocol::StreamDescriptor,
};

/// Routes page URLs to the resolver claiming their domain.
pub struct ResolverManager {
  pub resolvers: Vec<BoxedResolver>,
}

impl ResolverManager {
  /// Create a new ResolverManager with every resolver enabled in the config
  pub fn new(config: &crate::configs::Config, fetcher: Arc<dyn Fetcher>) -> Self {
    let mut resolvers: Vec<BoxedResolver> = Vec::new();

    macro_rules! register_resolver {
      ($enabled:expr, $name:literal, $ctor:expr) => {
        if $enabled {
          tracing::info!("Loaded resolver: {}", $name);
          resolvers.push(Box::new($ctor));
        }
      };
    }

    register_resolver!(
      config.resolvers.doodstream,
      "DoodStream",
      DoodstreamResolver::new(fetcher.clone())
    );
    register_resolver!(
      config.resolvers.rabbitstream,
      "Rabbitstream",
      RabbitstreamResolver::new(
        fetcher.clone(),
        config.rabbitstream.clone().unwrap_or_default(),
        config.http.user_agent.clone(),
      )
    );

    Self { resolvers }
  }

  pub fn with_resolvers(resolvers: Vec<BoxedResolver>) -> Self {
    Self { resolvers }
  }

  /// First registered resolver that can handle the URL.
  pub fn find(&self, url: &Url) -> Option<&dyn Resolver> {
    self
      .resolvers
      .iter()
      .find(|r| r.can_handle(url))
      .map(|r| r.as_ref())
  }

  /// Resolve a page URL with the first matching resolver.
  ///
  /// Failures are returned as-is; trying another provider is up to the caller.
  pub async fn resolve(&self, url: &Url) -> ResolveResult<Vec<StreamDescriptor>> {
    let Some(resolver) = self.find(url) else {
      tracing::debug!("No resolver could handle: {}", url);
      return Err(ResolveError::Unsupported(
        url.host_str().unwrap_or_default().to_string(),
      ));
    };

    tracing::trace!("Resolving '{}' with: {}", url, resolver.name());
    resolver.resolve(url).await
  }

  /// Get names of all registered resolvers
  pub fn resolver_names(&self) -> Vec<String> {
    self.resolvers.iter().map(|r| r.name().to_string()).collect()
  }
}
