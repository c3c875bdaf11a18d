use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use smallvec::SmallVec;

/// Suffix list for reference-directory lookup. Almost always one or two
/// entries, so it lives inline.
pub type SuffixList = SmallVec<[String; 2]>;

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Replaces every run of characters outside `[A-Za-z0-9_-]` with a single
/// underscore, so identifiers and device tokens always form valid file names.
pub fn normalize_token(token: &str) -> String {
    let pattern = TOKEN_PATTERN
        .get_or_init(|| Regex::new("[^A-Za-z0-9_-]+").expect("hard-coded pattern compiles"));
    pattern.replace_all(token, "_").into_owned()
}

/// Default reference-directory suffixes: the running target's pointer-width
/// token first, then the other, mirroring the `_32`/`_64` directory
/// convention.
pub fn default_suffixes() -> SuffixList {
    let mut suffixes = SuffixList::new();
    if cfg!(target_pointer_width = "64") {
        suffixes.push("_64".to_owned());
        suffixes.push("_32".to_owned());
    } else {
        suffixes.push("_32".to_owned());
        suffixes.push("_64".to_owned());
    }
    suffixes
}

/// Normalized token identifying the execution environment, appended to file
/// names in device-agnostic mode so different environments do not clobber
/// each other's reference images.
pub fn device_token() -> String {
    normalize_token(&format!(
        "{}_{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    ))
}

/// Appends `suffix` to the final component of `dir`
/// (`reference-images` + `_64` -> `reference-images_64`).
pub fn suffixed_dir(dir: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        return dir.to_path_buf();
    }
    let mut joined = dir.as_os_str().to_os_string();
    joined.push(suffix);
    PathBuf::from(joined)
}

/// Assembles the reference file name for a snapshot.
///
/// Deterministic for a given (test name, identifier, device-agnostic flag,
/// scale) tuple: `<test>[_<identifier>][_<device token>][@<scale>x].png`.
pub fn file_name(test_name: &str, identifier: &str, device_agnostic: bool, scale: u32) -> String {
    let mut stem = normalize_token(test_name);
    if !identifier.is_empty() {
        stem.push('_');
        stem.push_str(&normalize_token(identifier));
    }
    if device_agnostic {
        stem.push('_');
        stem.push_str(&device_token());
    }
    if scale > 1 {
        stem.push_str(&format!("@{scale}x"));
    }
    stem.push_str(".png");
    stem
}

/// The three artifact images written after a failed comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The candidate that failed the comparison.
    Failed,
    /// The diff visualization.
    Diff,
    /// A copy of the reference image.
    Reference,
}

impl ArtifactKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Failed => "failed_",
            Self::Diff => "diff_",
            Self::Reference => "reference_",
        }
    }

    /// Artifact file name for a given reference file name.
    pub fn file_name(self, reference_file_name: &str) -> String {
        format!("{}{}", self.prefix(), reference_file_name)
    }
}
