//! Reference-image snapshot testing for rendered UI components.
//!
//! Render a component to a [`Bitmap`], compare it against a previously
//! recorded reference image within a configurable pixel-difference
//! [`Tolerance`], and report pass/fail through [`assert_snapshot!`]. The
//! first run of a test is recorded by enabling
//! [`SnapshotConfig::record_mode`]; subsequent runs compare.
//!
//! ```no_run
//! use refshot::{assert_snapshot, Bitmap, SnapshotController};
//!
//! let controller = SnapshotController::new("buttons");
//! let rendered = Bitmap::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
//! assert_snapshot!(controller, rendered, "primary");
//! ```
//!
//! Reference images live under a root directory resolved once at controller
//! construction: an explicit [`SnapshotConfig`] override, the
//! `REFSHOT_REFERENCE_IMAGE_DIR` environment variable, or
//! `tests/reference-images` inside the test crate. On a mismatch, the
//! candidate, a diff visualization, and a copy of the reference are written
//! to a failed-artifact directory for postmortem inspection.

mod bitmap;
mod compare;
mod config;
mod controller;
mod error;
mod naming;
mod render;
mod store;

pub use bitmap::{Bitmap, Tolerance, BYTES_PER_PIXEL};
pub use compare::{compare, CompareOptions, Comparison};
pub use config::{SnapshotConfig, FAILED_IMAGE_DIR_ENV, REFERENCE_IMAGE_DIR_ENV};
pub use controller::{Mode, SnapshotController};
pub use error::{FailureArtifacts, SnapshotError};
pub use naming::SuffixList;
pub use render::Renderable;

/// Asserts that `target` renders identically to its recorded reference
/// image, panicking with a human-readable description otherwise.
///
/// The optional third argument is an identifier keeping multiple snapshot
/// assertions in one test collision-free.
///
/// ```no_run
/// use refshot::{assert_snapshot, Bitmap, SnapshotController};
///
/// let controller = SnapshotController::new("toolbar");
/// let rendered = Bitmap::from_rgba(1, 1, vec![255, 255, 255, 255]).unwrap();
///
/// assert_snapshot!(controller, rendered);
/// assert_snapshot!(controller, rendered, "collapsed");
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($controller:expr, $target:expr $(,)?) => {
        $crate::assert_snapshot!($controller, $target, "")
    };
    ($controller:expr, $target:expr, $identifier:expr $(,)?) => {
        match $controller.verify(&$target, $identifier) {
            Ok(()) => {}
            Err(error) => panic!("snapshot assertion failed: {error}"),
        }
    };
}
