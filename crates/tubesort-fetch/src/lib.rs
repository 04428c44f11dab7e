//! Metadata layer: turns a video link into the video's display title.

#[cfg(feature = "http")]
pub mod youtube;

#[cfg(feature = "http")]
pub use youtube::{DEFAULT_API_URL, FetchError, MetadataClient};
