pub mod language;
pub mod stream;

pub use language::SubtitleLanguage;
pub use stream::{StreamDescriptor, SubtitleTrack};
