//! Media content encoding for run outputs.
//!
//! - [`MediaEncoder`] classifies an output by its type tag and builds content blocks
//! - [`SecureFetcher`] downloads remote media under SSRF and size limits
//! - [`mime`] holds the extension allow-list

mod content;
mod encoder;
mod fetch;
pub mod mime;

pub use content::ContentBlock;
pub use encoder::{EncodeError, MediaEncoder, NO_OUTPUT_MESSAGE, OutputPayload};
pub use fetch::{MediaFetcher, SecureFetcher, check_host, validate_url};
pub use mime::{MediaKind, MediaUrl};
