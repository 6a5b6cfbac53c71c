use async_trait::async_trait;
use reqwest::Url;

use crate::{common::errors::ResolveResult, protocol::StreamDescriptor};

/// Trait that all hosting resolvers must implement.
///
/// Each provider (DoodStream, Rabbitstream, ...) turns one of its page URLs
/// into the playable streams hidden behind it.
#[async_trait]
pub trait Resolver: Send + Sync {
  /// Display name, e.g. "DoodStream".
  fn name(&self) -> &str;

  /// Domains this provider serves pages from. Used for routing only.
  fn domains(&self) -> &[&'static str];

  /// Check if the URL's host is one of [`Resolver::domains`] or a subdomain of one.
  fn can_handle(&self, url: &Url) -> bool {
    let Some(host) = url.host_str() else {
      return false;
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    self.domains().iter().any(|domain| {
      host == *domain
        || host
          .strip_suffix(domain)
          .is_some_and(|rest| rest.ends_with('.'))
    })
  }

  /// Resolve the page into one or more stream descriptors.
  ///
  /// Either the full, non-empty list is returned or the first failure.
  async fn resolve(&self, url: &Url) -> ResolveResult<Vec<StreamDescriptor>>;
}

pub type BoxedResolver = Box<dyn Resolver>;
