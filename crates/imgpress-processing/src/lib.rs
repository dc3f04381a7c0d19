//! Image conversion primitives: the fixed output-format registry, the
//! resize policy, and the per-file decode → resize → normalize → encode
//! pipeline. Everything here is pure and in-memory; storage and persistence
//! live in their own crates.

pub mod error;
pub mod format;
pub mod pipeline;
pub mod resize;

pub use error::ConversionError;
pub use format::{FormatLookup, OutputFormat};
pub use pipeline::{convert, output_filename, source_format_label, ConversionOutput, ConversionRequest};
pub use resize::{select_filter, target_dimensions};
