//! The fixed set of supported output encodings.

use std::fmt::{Display, Formatter, Result as FmtResult};

use image::ImageFormat;
use serde::Serialize;

/// Closed registry of output encodings the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Bmp,
    Gif,
    WebP,
}

/// Result of looking a format name up in the registry. The caller decides
/// what `Unknown` means; the upload path maps it to the default JPEG so the
/// fallback stays visible instead of happening inside a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatLookup {
    Known(OutputFormat),
    Unknown,
}

impl FormatLookup {
    /// Resolve to a concrete format, substituting `default` for `Unknown`.
    pub fn or_default(self, default: OutputFormat) -> OutputFormat {
        match self {
            FormatLookup::Known(format) => format,
            FormatLookup::Unknown => default,
        }
    }
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Bmp,
        OutputFormat::Gif,
        OutputFormat::WebP,
    ];

    /// Case-insensitive registry lookup. `jpg` is accepted as an alias.
    pub fn lookup(name: &str) -> FormatLookup {
        match name.trim().to_uppercase().as_str() {
            "JPEG" | "JPG" => FormatLookup::Known(OutputFormat::Jpeg),
            "PNG" => FormatLookup::Known(OutputFormat::Png),
            "BMP" => FormatLookup::Known(OutputFormat::Bmp),
            "GIF" => FormatLookup::Known(OutputFormat::Gif),
            "WEBP" => FormatLookup::Known(OutputFormat::WebP),
            _ => FormatLookup::Unknown,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Lowercase file extension for download filenames.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }

    /// Whether the encoding can carry an alpha channel. Sources with alpha
    /// must be flattened before encoding to a format where this is false.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Gif => "GIF",
            OutputFormat::WebP => "WEBP",
        };
        write!(f, "{}", name)
    }
}
