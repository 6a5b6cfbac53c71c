pub mod doodstream;
pub mod html;
pub mod manager;
pub mod plugin;
pub mod rabbitstream;

pub use manager::ResolverManager;
pub use plugin::{BoxedResolver, Resolver};
