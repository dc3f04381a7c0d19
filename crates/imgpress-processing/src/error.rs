use crate::format::OutputFormat;

/// Per-file conversion failure. The batch loop catches these at the file
/// boundary; they never abort the batch.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("computed target dimensions {width}x{height} contain a zero side")]
    ZeroDimension { width: u32, height: u32 },

    #[error("failed to encode image as {format}: {source}")]
    Encode {
        format: OutputFormat,
        #[source]
        source: image::ImageError,
    },
}
