use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Paths of the artifact images written after a mismatched comparison.
///
/// Each entry is present only if the corresponding best-effort write
/// succeeded; a missing entry never changes the comparison outcome.
#[derive(Debug, Clone, Default)]
pub struct FailureArtifacts {
    /// The candidate bitmap that failed the comparison.
    pub failed: Option<PathBuf>,
    /// The diff bitmap highlighting differing pixels.
    pub diff: Option<PathBuf>,
    /// A copy of the reference image the candidate was compared against.
    pub reference: Option<PathBuf>,
}

impl fmt::Display for FailureArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = [
            ("failed image", &self.failed),
            ("diff image", &self.diff),
            ("reference copy", &self.reference),
        ];
        for (label, path) in entries {
            if let Some(path) = path {
                write!(f, "; {}: {}", label, path.display())?;
            }
        }
        Ok(())
    }
}

/// Everything that can go wrong while recording or comparing a snapshot.
///
/// All variants are surfaced as values; the orchestration layer never aborts
/// the process. [`ReferenceMissing`](SnapshotError::ReferenceMissing) is kept
/// distinct from [`PixelMismatch`](SnapshotError::PixelMismatch) so callers
/// can tell "never recorded" apart from "recorded but different".
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The bitmap buffer does not satisfy the stride/length invariants.
    #[error(
        "invalid bitmap layout: {width}x{height} with stride {stride} does not fit {len} bytes"
    )]
    Layout {
        width: u32,
        height: u32,
        stride: usize,
        len: usize,
    },

    /// Reference and candidate have different dimensions. Never tolerated,
    /// regardless of the configured tolerance.
    #[error(
        "dimension mismatch: reference is {reference_width}x{reference_height}, \
         candidate is {candidate_width}x{candidate_height}"
    )]
    DimensionMismatch {
        reference_width: u32,
        reference_height: u32,
        candidate_width: u32,
        candidate_height: u32,
    },

    /// No reference image has been recorded for this snapshot.
    #[error("no reference image found at {}; enable record mode to create one", .path.display())]
    ReferenceMissing { path: PathBuf },

    /// The reference file exists but could not be decoded as a PNG.
    #[error("failed to decode reference image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The bitmap could not be encoded as a PNG.
    #[error("failed to encode snapshot as PNG: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },

    /// A filesystem read or write failed.
    #[error("snapshot I/O failed at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The comparison ran but the candidate differs from its reference.
    #[error(
        "snapshot '{name}' does not match its reference: {differing} of {total} pixels differ \
         (fraction {fraction:.6}, tolerance {tolerance}){artifacts}"
    )]
    PixelMismatch {
        /// Resolved snapshot name (test name plus identifier and suffixes).
        name: String,
        differing: u64,
        total: u64,
        fraction: f64,
        tolerance: f64,
        artifacts: FailureArtifacts,
    },
}
