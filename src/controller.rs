use std::path::{Path, PathBuf};

use crate::bitmap::{Bitmap, Tolerance};
use crate::compare::{compare, CompareOptions};
use crate::config::{self, SnapshotConfig};
use crate::error::{FailureArtifacts, SnapshotError};
use crate::naming::{self, ArtifactKind, SuffixList};
use crate::render::Renderable;
use crate::store;

/// Orchestration mode, selected once per test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every assertion records the rendered bitmap as the new reference.
    Record,
    /// Every assertion compares the rendered bitmap against its reference.
    Compare,
}

/// Records and compares snapshots for one test case.
///
/// Construction resolves the reference and failed-artifact directories once,
/// in priority order (explicit override, environment variable, conventional
/// default); nothing reads the environment afterwards. Each assertion then
/// renders, and records or compares depending on the mode, blocking the
/// calling test until the filesystem work and pixel comparison complete.
///
/// # Examples
///
/// ```no_run
/// use refshot::{assert_snapshot, Bitmap, SnapshotConfig, SnapshotController};
///
/// let controller = SnapshotController::with_config(
///     "buttons",
///     SnapshotConfig::default().with_reference_dir("tests/reference-images"),
/// );
///
/// let rendered = Bitmap::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
/// assert_snapshot!(controller, rendered, "primary");
/// ```
#[derive(Debug)]
pub struct SnapshotController {
    test_name: String,
    record_mode: bool,
    device_agnostic: bool,
    tolerance: Tolerance,
    compare_options: CompareOptions,
    reference_dir: PathBuf,
    failed_dir: PathBuf,
    suffixes: SuffixList,
}

impl SnapshotController {
    /// Creates a controller for `test_name` with the default configuration.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self::with_config(test_name, SnapshotConfig::default())
    }

    /// Creates a controller for `test_name`, resolving directories from
    /// `config` immediately.
    pub fn with_config(test_name: impl Into<String>, config: SnapshotConfig) -> Self {
        let reference_dir = config::resolve_reference_dir(config.reference_dir.as_deref());
        let failed_dir = config::resolve_failed_dir(config.failed_dir.as_deref());
        let suffixes = config.suffixes.unwrap_or_else(naming::default_suffixes);
        Self {
            test_name: test_name.into(),
            record_mode: config.record_mode,
            device_agnostic: config.device_agnostic,
            tolerance: config.tolerance,
            compare_options: config.compare,
            reference_dir,
            failed_dir,
            suffixes,
        }
    }

    /// The mode every assertion of this controller runs in.
    pub fn mode(&self) -> Mode {
        if self.record_mode {
            Mode::Record
        } else {
            Mode::Compare
        }
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Resolved reference-image root (before directory suffixing).
    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }

    /// Resolved failed-artifact directory.
    pub fn failed_dir(&self) -> &Path {
        &self.failed_dir
    }

    /// The single assertion operation: renders `target`, then records or
    /// compares depending on the mode. An empty identifier is allowed when a
    /// test holds only one snapshot assertion.
    pub fn verify(&self, target: &impl Renderable, identifier: &str) -> Result<(), SnapshotError> {
        let rendered = target.render()?;
        match self.mode() {
            Mode::Record => self.record(&rendered, identifier),
            Mode::Compare => self.compare(&rendered, identifier),
        }
    }

    /// Encodes `bitmap` and writes it as the reference for `identifier`,
    /// overwriting any existing file.
    pub fn record(&self, bitmap: &Bitmap, identifier: &str) -> Result<(), SnapshotError> {
        let path = self.reference_path(identifier, bitmap.scale());
        store::write_png(&path, bitmap)?;
        tracing::info!(path = %path.display(), "recorded reference image");
        Ok(())
    }

    /// Compares `candidate` against the recorded reference for `identifier`.
    pub fn compare(&self, candidate: &Bitmap, identifier: &str) -> Result<(), SnapshotError> {
        let file_name = self.file_name(identifier, candidate.scale());
        let path = self
            .existing_reference_path(&file_name)
            .ok_or_else(|| SnapshotError::ReferenceMissing {
                path: self.primary_path(&file_name),
            })?;

        let reference = store::read_png(&path)?;
        let result = compare(&reference, candidate, self.tolerance, &self.compare_options)?;
        if result.matches {
            return Ok(());
        }

        let artifacts =
            self.write_failure_artifacts(&file_name, candidate, &reference, result.diff.as_ref());
        let name = file_name.trim_end_matches(".png").to_owned();
        Err(SnapshotError::PixelMismatch {
            name,
            differing: result.differing_pixels,
            total: result.total_pixels,
            fraction: result.fraction(),
            tolerance: self.tolerance.fraction(),
            artifacts,
        })
    }

    /// Whether a reference image exists for `identifier` at `scale` in any
    /// suffixed reference directory.
    pub fn reference_recorded(&self, identifier: &str, scale: u32) -> bool {
        let file_name = self.file_name(identifier, scale);
        self.existing_reference_path(&file_name).is_some()
    }

    /// The path a reference for `identifier` at `scale` is recorded to
    /// (the first suffixed directory).
    pub fn reference_path(&self, identifier: &str, scale: u32) -> PathBuf {
        self.primary_path(&self.file_name(identifier, scale))
    }

    fn file_name(&self, identifier: &str, scale: u32) -> String {
        naming::file_name(&self.test_name, identifier, self.device_agnostic, scale)
    }

    fn primary_path(&self, file_name: &str) -> PathBuf {
        let suffix = self.suffixes.first().map(String::as_str).unwrap_or("");
        naming::suffixed_dir(&self.reference_dir, suffix).join(file_name)
    }

    /// The first suffixed directory containing the reference, in suffix
    /// order.
    fn existing_reference_path(&self, file_name: &str) -> Option<PathBuf> {
        if self.suffixes.is_empty() {
            let path = self.reference_dir.join(file_name);
            return path.is_file().then_some(path);
        }
        self.suffixes.iter().find_map(|suffix| {
            let path = naming::suffixed_dir(&self.reference_dir, suffix).join(file_name);
            path.is_file().then_some(path)
        })
    }

    /// Best-effort artifact writes. Failures are logged and swallowed so an
    /// artifact-write error never masks the comparison outcome.
    fn write_failure_artifacts(
        &self,
        file_name: &str,
        candidate: &Bitmap,
        reference: &Bitmap,
        diff: Option<&Bitmap>,
    ) -> FailureArtifacts {
        FailureArtifacts {
            failed: self.write_artifact(ArtifactKind::Failed, file_name, candidate),
            diff: diff.and_then(|diff| self.write_artifact(ArtifactKind::Diff, file_name, diff)),
            reference: self.write_artifact(ArtifactKind::Reference, file_name, reference),
        }
    }

    fn write_artifact(
        &self,
        kind: ArtifactKind,
        file_name: &str,
        bitmap: &Bitmap,
    ) -> Option<PathBuf> {
        let path = self.failed_dir.join(kind.file_name(file_name));
        match store::write_png(&path, bitmap) {
            Ok(()) => Some(path),
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "failed to write failure artifact");
                None
            }
        }
    }
}
