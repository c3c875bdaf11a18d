use std::path::{Path, PathBuf};

use crate::bitmap::Tolerance;
use crate::compare::CompareOptions;
use crate::naming::SuffixList;

/// Environment variable overriding the reference-image root directory.
pub const REFERENCE_IMAGE_DIR_ENV: &str = "REFSHOT_REFERENCE_IMAGE_DIR";

/// Environment variable overriding the failed-artifact output directory.
pub const FAILED_IMAGE_DIR_ENV: &str = "REFSHOT_FAILED_IMAGE_DIR";

/// Conventional reference subdirectory inside the test crate, used when
/// neither an override nor the environment variable is set.
const DEFAULT_REFERENCE_SUBDIR: &str = "tests/reference-images";

const DEFAULT_FAILED_SUBDIR: &str = "refshot-failed";

/// Options recognized by a [`SnapshotController`](crate::SnapshotController).
///
/// Directory fields are overrides; the full priority-ordered resolution
/// (override, environment variable, conventional test-crate subdirectory)
/// happens once at controller construction, never as ambient global state.
///
/// # Examples
///
/// ```
/// use refshot::{SnapshotConfig, Tolerance};
///
/// let config = SnapshotConfig::default()
///     .with_tolerance(Tolerance::new(0.01))
///     .with_device_agnostic(true);
/// assert!(!config.record_mode);
/// assert_eq!(config.tolerance.fraction(), 0.01);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotConfig {
    /// When true, every assertion records instead of comparing.
    pub record_mode: bool,
    /// When true, reference file names carry the execution-environment token.
    pub device_agnostic: bool,
    /// Allowed fraction of differing pixels. Defaults to pixel-perfect.
    pub tolerance: Tolerance,
    /// Per-pixel comparison tunables.
    pub compare: CompareOptions,
    /// Explicit reference-image root, overriding environment and defaults.
    pub reference_dir: Option<PathBuf>,
    /// Explicit failed-artifact directory, overriding environment and defaults.
    pub failed_dir: Option<PathBuf>,
    /// Reference-directory suffixes searched in order. Defaults to the
    /// pointer-width tokens of the running target.
    pub suffixes: Option<SuffixList>,
}

impl SnapshotConfig {
    pub fn with_record_mode(mut self, record_mode: bool) -> Self {
        self.record_mode = record_mode;
        self
    }

    pub fn with_device_agnostic(mut self, device_agnostic: bool) -> Self {
        self.device_agnostic = device_agnostic;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_compare(mut self, compare: CompareOptions) -> Self {
        self.compare = compare;
        self
    }

    pub fn with_reference_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reference_dir = Some(dir.into());
        self
    }

    pub fn with_failed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failed_dir = Some(dir.into());
        self
    }

    pub fn with_suffixes(mut self, suffixes: SuffixList) -> Self {
        self.suffixes = Some(suffixes);
        self
    }
}

/// Reference-image root, in priority order: explicit override, environment
/// variable, conventional subdirectory of the test crate (cargo exports
/// `CARGO_MANIFEST_DIR` to test processes), relative fallback.
pub(crate) fn resolve_reference_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(REFERENCE_IMAGE_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        return Path::new(&manifest_dir).join(DEFAULT_REFERENCE_SUBDIR);
    }
    PathBuf::from(DEFAULT_REFERENCE_SUBDIR)
}

/// Failed-artifact directory: explicit override, environment variable, then
/// a subdirectory of the system temp dir.
pub(crate) fn resolve_failed_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(FAILED_IMAGE_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    std::env::temp_dir().join(DEFAULT_FAILED_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let dir = resolve_reference_dir(Some(Path::new("/elsewhere/refs")));
        assert_eq!(dir, PathBuf::from("/elsewhere/refs"));

        let failed = resolve_failed_dir(Some(Path::new("/elsewhere/failed")));
        assert_eq!(failed, PathBuf::from("/elsewhere/failed"));
    }

    #[test]
    fn falls_back_to_test_crate_subdirectory() {
        // Cargo always sets CARGO_MANIFEST_DIR for test processes.
        let dir = resolve_reference_dir(None);
        assert!(dir.ends_with(DEFAULT_REFERENCE_SUBDIR));
    }

    #[test]
    fn failed_dir_falls_back_to_temp() {
        let dir = resolve_failed_dir(None);
        assert!(dir.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn builders_compose() {
        let config = SnapshotConfig::default()
            .with_record_mode(true)
            .with_reference_dir("/r")
            .with_failed_dir("/f");
        assert!(config.record_mode);
        assert_eq!(config.reference_dir.as_deref(), Some(Path::new("/r")));
        assert_eq!(config.failed_dir.as_deref(), Some(Path::new("/f")));
    }
}
