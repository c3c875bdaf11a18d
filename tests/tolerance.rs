//! Comparator property tests: identity, the dimension guard, tolerance
//! monotonicity, and the exact-boundary behavior.
use refshot::{compare, Bitmap, CompareOptions, SnapshotError, Tolerance};
use refshot_test_scenes::{checkerboard, gradient, perturb_pixels, solid, CANVAS_HEIGHT, CANVAS_WIDTH};
use test_case::test_case;

const CANVAS_PIXELS: u64 = (CANVAS_WIDTH as u64) * (CANVAS_HEIGHT as u64);

fn bitmap_2x2(pixels: [[u8; 4]; 4]) -> Bitmap {
    let mut data = Vec::with_capacity(16);
    for pixel in pixels {
        data.extend_from_slice(&pixel);
    }
    Bitmap::from_rgba(2, 2, data).unwrap()
}

#[test]
fn any_bitmap_matches_itself_at_zero_tolerance() {
    for bitmap in [gradient(), checkerboard(8), solid([1, 2, 3, 4])] {
        let result = compare(&bitmap, &bitmap, Tolerance::ZERO, &CompareOptions::strict()).unwrap();
        assert!(result.matches);
        assert_eq!(result.differing_pixels, 0);
        assert_eq!(result.total_pixels, CANVAS_PIXELS);
    }
}

#[test_case(0.0)]
#[test_case(0.5)]
#[test_case(1.0)]
fn dimension_mismatch_fails_regardless_of_tolerance(tolerance: f64) {
    let reference = gradient();
    let candidate = Bitmap::from_rgba(2, 2, vec![0; 16]).unwrap();
    let error = compare(
        &reference,
        &candidate,
        Tolerance::new(tolerance),
        &CompareOptions::strict(),
    )
    .unwrap_err();
    assert!(matches!(error, SnapshotError::DimensionMismatch { .. }));
}

// A quarter of the canvas differs; the verdict must flip exactly at 0.25 and
// never flip back above it.
#[test_case(0.0, false)]
#[test_case(0.2, false)]
#[test_case(0.25, true; "exact boundary matches")]
#[test_case(0.3, true)]
#[test_case(1.0, true)]
fn tolerance_is_monotone(tolerance: f64, expected_match: bool) {
    let reference = gradient();
    let candidate = perturb_pixels(&reference, CANVAS_PIXELS / 4);

    let result = compare(
        &reference,
        &candidate,
        Tolerance::new(tolerance),
        &CompareOptions::strict(),
    )
    .unwrap();
    assert_eq!(result.differing_pixels, CANVAS_PIXELS / 4);
    assert_eq!(result.matches, expected_match);
}

#[test]
fn one_of_four_pixels_differing_by_50_in_red_with_threshold_10() {
    let base = [100u8, 100, 100, 255];
    let reference = bitmap_2x2([base, base, base, base]);
    let candidate = bitmap_2x2([[150, 100, 100, 255], base, base, base]);

    let options = CompareOptions::strict().with_channel_threshold(10);

    let quarter = compare(&reference, &candidate, Tolerance::new(0.25), &options).unwrap();
    assert_eq!(quarter.differing_pixels, 1);
    assert_eq!(quarter.total_pixels, 4);
    assert!(quarter.matches, "1/4 differing is within tolerance 0.25");

    let tenth = compare(&reference, &candidate, Tolerance::new(0.1), &options).unwrap();
    assert!(!tenth.matches, "1/4 differing exceeds tolerance 0.1");
}

#[test]
fn sub_threshold_noise_counts_as_equal() {
    let reference = bitmap_2x2([[100, 100, 100, 255]; 4]);
    let candidate = bitmap_2x2([[109, 100, 100, 255]; 4]);

    let options = CompareOptions::strict().with_channel_threshold(10);
    let result = compare(&reference, &candidate, Tolerance::ZERO, &options).unwrap();
    assert!(result.matches);
    assert_eq!(result.differing_pixels, 0);
}

#[test]
fn transparent_padding_never_flags_pixels() {
    let reference = bitmap_2x2([[9, 9, 9, 255], [10, 0, 0, 0], [20, 0, 0, 0], [9, 9, 9, 255]]);
    let candidate = bitmap_2x2([[9, 9, 9, 255], [99, 5, 5, 0], [0, 0, 77, 0], [9, 9, 9, 255]]);

    let result = compare(&reference, &candidate, Tolerance::ZERO, &CompareOptions::strict()).unwrap();
    assert!(result.matches, "fully transparent pixels compare equal");
}

#[test]
fn diff_bitmap_has_input_dimensions() {
    let reference = gradient();
    let candidate = perturb_pixels(&reference, 10);

    let result = compare(
        &reference,
        &candidate,
        Tolerance::ZERO,
        &CompareOptions::strict(),
    )
    .unwrap();
    let diff = result.diff.expect("diff requested by default");
    assert_eq!(diff.width(), CANVAS_WIDTH);
    assert_eq!(diff.height(), CANVAS_HEIGHT);
    // First perturbed pixel is highlighted, last canvas pixel is untouched.
    assert_eq!(diff.pixel(0, 0).map(|p| (p[0], p[3] > 0)), Some((255, true)));
    assert_eq!(
        diff.pixel(CANVAS_WIDTH - 1, CANVAS_HEIGHT - 1),
        Some([0, 0, 0, 0])
    );
}
