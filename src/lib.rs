pub mod common;
pub mod configs;
pub mod protocol;
pub mod resolvers;

pub use common::errors::{ResolveError, ResolveResult};
pub use protocol::{StreamDescriptor, SubtitleLanguage, SubtitleTrack};
pub use resolvers::{Resolver, ResolverManager};
