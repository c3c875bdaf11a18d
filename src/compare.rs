use crate::bitmap::{Bitmap, Tolerance, BYTES_PER_PIXEL};
use crate::error::SnapshotError;

/// Tunables for the per-pixel comparison.
///
/// The per-channel threshold decides when two channel values count as equal;
/// the tolerance passed to [`compare`] decides how many unequal pixels the
/// whole comparison may accumulate. The default threshold is 0: any
/// byte-level channel difference marks the pixel as different.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Per-channel absolute difference at or below which two channels still
    /// count as equal (0-255).
    pub channel_threshold: u8,
    /// Produce a diff bitmap highlighting differing pixels.
    pub generate_diff: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            channel_threshold: 0,
            generate_diff: true,
        }
    }
}

impl CompareOptions {
    /// Exact channel values required (threshold 0).
    pub fn strict() -> Self {
        Self::default()
    }

    /// Treats sub-threshold channel noise, such as anti-aliasing rounding,
    /// as equal (threshold 5).
    pub fn anti_aliased() -> Self {
        Self {
            channel_threshold: 5,
            generate_diff: true,
        }
    }

    /// Sets the per-channel threshold.
    pub fn with_channel_threshold(mut self, threshold: u8) -> Self {
        self.channel_threshold = threshold;
        self
    }

    /// Enables or disables diff bitmap generation.
    pub fn with_generate_diff(mut self, generate: bool) -> Self {
        self.generate_diff = generate;
        self
    }
}

/// Result of comparing a candidate bitmap against a reference.
///
/// Created per comparison call, never persisted.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Whether the candidate matched within the tolerance.
    pub matches: bool,
    /// Number of pixels flagged as different.
    pub differing_pixels: u64,
    /// Total number of pixels compared.
    pub total_pixels: u64,
    /// Diff bitmap at the input dimensions, if requested.
    pub diff: Option<Bitmap>,
}

impl Comparison {
    /// Fraction of differing pixels in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.differing_pixels as f64 / self.total_pixels as f64
        }
    }
}

/// Compares two equally sized bitmaps under a fractional pixel tolerance.
///
/// A pixel counts as different when any channel's absolute difference exceeds
/// the configured per-channel threshold, except that two fully transparent
/// pixels are always equal whatever their RGB bytes (their composited color
/// is irrelevant). The verdict is a match iff
/// `differing_pixels / total_pixels <= tolerance`, boundary included.
///
/// Fails with [`SnapshotError::DimensionMismatch`] when the dimensions
/// differ; no tolerance value excuses that. Pure function: no I/O.
///
/// # Examples
///
/// ```
/// use refshot::{compare, Bitmap, CompareOptions, Tolerance};
///
/// let reference = Bitmap::from_rgba(1, 1, vec![10, 20, 30, 255]).unwrap();
/// let candidate = Bitmap::from_rgba(1, 1, vec![10, 20, 30, 255]).unwrap();
///
/// let result = compare(
///     &reference,
///     &candidate,
///     Tolerance::ZERO,
///     &CompareOptions::strict(),
/// )
/// .unwrap();
/// assert!(result.matches);
/// assert_eq!(result.differing_pixels, 0);
/// ```
pub fn compare(
    reference: &Bitmap,
    candidate: &Bitmap,
    tolerance: Tolerance,
    options: &CompareOptions,
) -> Result<Comparison, SnapshotError> {
    if reference.width() != candidate.width() || reference.height() != candidate.height() {
        return Err(SnapshotError::DimensionMismatch {
            reference_width: reference.width(),
            reference_height: reference.height(),
            candidate_width: candidate.width(),
            candidate_height: candidate.height(),
        });
    }

    let total_pixels = reference.total_pixels();

    // Identical buffers short-circuit without the per-pixel walk.
    if reference.stride() == candidate.stride() && reference.data() == candidate.data() {
        return Ok(Comparison {
            matches: true,
            differing_pixels: 0,
            total_pixels,
            diff: None,
        });
    }

    let width = reference.width() as usize;
    let mut differing_pixels = 0u64;
    let mut diff_data = if options.generate_diff {
        Some(Vec::with_capacity(width * BYTES_PER_PIXEL * reference.height() as usize))
    } else {
        None
    };

    for (reference_row, candidate_row) in reference.rows().zip(candidate.rows()) {
        for x in 0..width {
            let offset = x * BYTES_PER_PIXEL;
            let reference_pixel = &reference_row[offset..offset + BYTES_PER_PIXEL];
            let candidate_pixel = &candidate_row[offset..offset + BYTES_PER_PIXEL];

            let differs =
                pixels_differ(reference_pixel, candidate_pixel, options.channel_threshold);
            if differs {
                differing_pixels += 1;
            }

            if let Some(ref mut diff_data) = diff_data {
                diff_data.extend_from_slice(&diff_pixel(
                    reference_pixel,
                    candidate_pixel,
                    differs,
                ));
            }
        }
    }

    let diff = match diff_data {
        // The diff buffer is tight by construction, so this cannot fail.
        Some(data) => Some(Bitmap::from_rgba(reference.width(), reference.height(), data)?),
        None => None,
    };

    let matches = if total_pixels == 0 {
        true
    } else {
        differing_pixels as f64 / total_pixels as f64 <= tolerance.fraction()
    };

    Ok(Comparison {
        matches,
        differing_pixels,
        total_pixels,
        diff,
    })
}

fn pixels_differ(reference: &[u8], candidate: &[u8], threshold: u8) -> bool {
    // Two fully transparent pixels composite identically whatever their RGB
    // bytes say.
    if reference[3] == 0 && candidate[3] == 0 {
        return false;
    }
    let threshold = i16::from(threshold);
    reference
        .iter()
        .zip(candidate)
        .any(|(&a, &b)| (i16::from(a) - i16::from(b)).abs() > threshold)
}

/// Differing pixels are highlighted in red with alpha scaled by the largest
/// channel difference; matching pixels stay fully transparent.
fn diff_pixel(reference: &[u8], candidate: &[u8], differs: bool) -> [u8; 4] {
    if !differs {
        return [0, 0, 0, 0];
    }
    let magnitude = reference
        .iter()
        .zip(candidate)
        .map(|(&a, &b)| (i16::from(a) - i16::from(b)).unsigned_abs() as u8)
        .max()
        .unwrap_or(0);
    [255, 0, 0, magnitude.saturating_mul(2)]
}
