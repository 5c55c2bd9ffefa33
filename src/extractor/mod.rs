//! Media extraction engine boundary
//!
//! The extraction engine resolves a URL to downloadable media streams,
//! performs muxing/transcoding, and reports byte-level progress. It is an
//! external collaborator: this module defines the trait seam plus a
//! CLI-backed implementation that shells out to a yt-dlp-compatible binary.
//! An out-of-process worker speaking the same contract is an equally valid
//! implementation.

mod cli;
pub(crate) mod parser;
mod traits;

pub use cli::CliExtractor;
pub use traits::{ExtractionRequest, Extractor, FormatSelection, RawProgress, StreamVariant};
