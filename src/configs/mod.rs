pub mod base;
pub mod http;
pub mod logging;
pub mod resolvers;

pub use base::*;
pub use http::*;
pub use logging::*;
pub use resolvers::*;
