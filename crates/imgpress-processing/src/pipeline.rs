//! Per-file conversion pipeline: decode, resize, alpha normalization,
//! re-encode.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::error::ConversionError;
use crate::format::OutputFormat;
use crate::resize::{select_filter, target_dimensions};

/// Quality used when the caller does not choose one. The batch upload path
/// overrides this with the configured value.
pub const DEFAULT_QUALITY: u8 = 85;

/// One file's worth of conversion parameters. Ephemeral; never persisted.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub data: Bytes,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: OutputFormat,
    pub quality: u8,
}

impl ConversionRequest {
    pub fn new(data: Bytes, format: OutputFormat) -> Self {
        ConversionRequest {
            data,
            width: None,
            height: None,
            format,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Encoded output plus its final dimensions.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Run the full pipeline for one file.
///
/// Unreadable input surfaces as `ConversionError::Decode`; the caller treats
/// any error here as "skip this file". The requested format is always a
/// registry member - unknown format strings were already coerced upstream.
pub fn convert(request: &ConversionRequest) -> Result<ConversionOutput, ConversionError> {
    let reader = image::ImageReader::new(Cursor::new(request.data.as_ref()))
        .with_guessed_format()
        .map_err(|e| ConversionError::Decode(e.to_string()))?;
    let mut img = reader
        .decode()
        .map_err(|e| ConversionError::Decode(e.to_string()))?;

    if request.width.is_some() || request.height.is_some() {
        let (src_width, src_height) = img.dimensions();
        let (out_width, out_height) =
            target_dimensions(src_width, src_height, request.width, request.height)?;
        let filter = select_filter(src_width, src_height, out_width, out_height);
        img = img.resize_exact(out_width, out_height, filter);
    }

    if !request.format.supports_alpha() && img.color().has_alpha() {
        img = flatten_onto_white(&img);
    }

    let (width, height) = img.dimensions();
    let data = encode(&img, request.format, request.quality)?;
    Ok(ConversionOutput {
        data,
        width,
        height,
    })
}

/// Composite an image with alpha onto an opaque white background. Required
/// before encoding to formats without an alpha channel, where dropping the
/// channel outright would leave transparent regions black.
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &rgba, 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Bytes, ConversionError> {
    // Normalize color type to what each encoder accepts. JPEG is 8-bit RGB;
    // the GIF and WebP encoders want 8-bit RGB(A).
    let normalized;
    let img = match format {
        OutputFormat::Jpeg => {
            normalized = DynamicImage::ImageRgb8(img.to_rgb8());
            &normalized
        }
        OutputFormat::Gif | OutputFormat::WebP => {
            normalized = DynamicImage::ImageRgba8(img.to_rgba8());
            &normalized
        }
        _ => img,
    };

    let mut buffer = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
            img.write_with_encoder(encoder)
                .map_err(|source| ConversionError::Encode { format, source })?;
        }
        _ => {
            img.write_to(&mut Cursor::new(&mut buffer), format.to_image_format())
                .map_err(|source| ConversionError::Encode { format, source })?;
        }
    }
    Ok(Bytes::from(buffer))
}

/// Download filename for a converted file: source stem plus the target
/// format's lowercase extension.
pub fn output_filename(source_filename: &str, format: OutputFormat) -> String {
    let stem = source_filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|s| !s.is_empty())
        .unwrap_or(source_filename);
    format!("{}.{}", stem, format.extension())
}

/// Uppercase source-format label for the history ledger, taken from the
/// uploaded filename's extension.
pub fn source_format_label(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}
