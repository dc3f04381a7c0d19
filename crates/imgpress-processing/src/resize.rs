//! Resize policy: pure dimension arithmetic plus resampling-filter choice.

use image::imageops::FilterType;

use crate::error::ConversionError;

/// Compute output dimensions from the source size and optional targets.
///
/// Both targets set is an exact stretch (aspect ratio not preserved); a
/// single target scales the other side by the source aspect ratio, rounding
/// half away from zero; neither leaves the image untouched. A computed side
/// of zero is an error - callers must reject zero/negative *requested*
/// dimensions before this runs.
pub fn target_dimensions(
    src_width: u32,
    src_height: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<(u32, u32), ConversionError> {
    let (out_width, out_height) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = (src_height as f64 * w as f64 / src_width as f64).round() as u32;
            (w, h)
        }
        (None, Some(h)) => {
            let w = (src_width as f64 * h as f64 / src_height as f64).round() as u32;
            (w, h)
        }
        (None, None) => (src_width, src_height),
    };

    if out_width == 0 || out_height == 0 {
        return Err(ConversionError::ZeroDimension {
            width: out_width,
            height: out_height,
        });
    }
    Ok((out_width, out_height))
}

/// Pick a resampling filter by downscale ratio. Lanczos3 where quality
/// matters most; cheaper kernels for aggressive downscales where ringing
/// outweighs sharpness.
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_targets_stretch_exactly() {
        assert_eq!(
            target_dimensions(100, 100, Some(50), Some(75)).unwrap(),
            (50, 75)
        );
    }

    #[test]
    fn test_width_only_preserves_aspect() {
        // 200x100 at width 100 -> height 50
        assert_eq!(
            target_dimensions(200, 100, Some(100), None).unwrap(),
            (100, 50)
        );
        // Upscale: 100x50 at width 200 -> height 100
        assert_eq!(
            target_dimensions(100, 50, Some(200), None).unwrap(),
            (200, 100)
        );
    }

    #[test]
    fn test_height_only_preserves_aspect() {
        assert_eq!(
            target_dimensions(100, 50, None, Some(100)).unwrap(),
            (200, 100)
        );
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // 100x50 at width 33: 50 * 33 / 100 = 16.5, rounds up to 17.
        assert_eq!(
            target_dimensions(100, 50, Some(33), None).unwrap(),
            (33, 17)
        );
        // 100x50 at width 31: 15.5 rounds to 16, not 15.
        assert_eq!(
            target_dimensions(100, 50, Some(31), None).unwrap(),
            (31, 16)
        );
    }

    #[test]
    fn test_no_targets_is_identity() {
        assert_eq!(target_dimensions(640, 480, None, None).unwrap(), (640, 480));
    }

    #[test]
    fn test_collapsed_dimension_is_an_error() {
        // 1000x1 at width 100: height rounds to 0.
        let err = target_dimensions(1000, 1, Some(100), None).unwrap_err();
        match err {
            ConversionError::ZeroDimension { width, height } => {
                assert_eq!(width, 100);
                assert_eq!(height, 0);
            }
            other => panic!("expected ZeroDimension, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_selection_by_ratio() {
        // Mild downscale keeps Lanczos3.
        assert_eq!(select_filter(100, 100, 80, 80), FilterType::Lanczos3);
        // Between 1.5x and 2x uses CatmullRom.
        assert_eq!(select_filter(100, 100, 60, 60), FilterType::CatmullRom);
        // Aggressive downscale falls back to Triangle.
        assert_eq!(select_filter(100, 100, 25, 25), FilterType::Triangle);
        // Upscales stay on Lanczos3.
        assert_eq!(select_filter(50, 50, 100, 100), FilterType::Lanczos3);
    }
}
