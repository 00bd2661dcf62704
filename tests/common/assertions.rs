//! Test assertion helpers
//!
//! Delta ratios are floating point; compare them with a tolerance.

/// Assert that two floating-point values are approximately equal
///
/// # Examples
///
/// ```
/// # use build_tracker_tests::assertions::assert_approx_eq;
/// assert_approx_eq(ratio, 1.1111, 0.001);
/// ```
#[allow(dead_code)]
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Float values not approximately equal:\n  actual: {}\n  expected: {}\n  diff: {} (epsilon: {})",
        actual, expected, diff, epsilon
    );
}

/// Assert that a ratio is a non-negative number (infinity allowed)
#[allow(dead_code)]
pub fn assert_valid_ratio(ratio: f64) {
    assert!(!ratio.is_nan(), "ratio should not be NaN");
    assert!(ratio >= 0.0, "ratio should be non-negative, got {}", ratio);
}
