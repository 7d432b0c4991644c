//! Rotation geometry helpers.
//!
//! Pure functions shared by the crop transform: degree/radian conversion and
//! the axis-aligned bounding box of a rectangle rotated about its center.
//!
//! The bounding box of a `w x h` rectangle rotated by angle θ is:
//! ```text
//! bbox_w = |cos(θ)| * w + |sin(θ)| * h
//! bbox_h = |sin(θ)| * w + |cos(θ)| * h
//! ```

/// Axis-aligned bounding box dimensions of a rotated rectangle.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Bounding box width in pixels
    pub width: f64,
    /// Bounding box height in pixels
    pub height: f64,
}

/// Convert a rotation in degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Compute the axis-aligned bounding box of a `width x height` rectangle
/// rotated about its center by `rotation_degrees`.
///
/// The result is exact up to floating-point precision: for rotations of
/// 0/180 degrees it equals the input dimensions, for 90/270 degrees the
/// swapped dimensions. Angles outside [0, 360) wrap implicitly through the
/// trigonometric functions; no normalization is applied.
///
/// No rounding happens here. Callers that size pixel surfaces from the
/// result truncate, the same way canvas element sizing does.
pub fn rotated_bounding_box(width: f64, height: f64, rotation_degrees: f64) -> BoundingBox {
    let theta = degrees_to_radians(rotation_degrees);
    let cos = theta.cos().abs();
    let sin = theta.sin().abs();

    BoundingBox {
        width: cos * width + sin * height,
        height: sin * width + cos * height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOLERANCE, "expected {b}, got {a}");
    }

    #[test]
    fn test_degrees_to_radians() {
        assert_close(degrees_to_radians(0.0), 0.0);
        assert_close(degrees_to_radians(180.0), std::f64::consts::PI);
        assert_close(degrees_to_radians(90.0), std::f64::consts::FRAC_PI_2);
        assert_close(degrees_to_radians(-90.0), -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_no_rotation_preserves_dimensions() {
        let bbox = rotated_bounding_box(100.0, 50.0, 0.0);
        assert_close(bbox.width, 100.0);
        assert_close(bbox.height, 50.0);
    }

    #[test]
    fn test_90_degrees_swaps_dimensions() {
        let bbox = rotated_bounding_box(100.0, 50.0, 90.0);
        assert_close(bbox.width, 50.0);
        assert_close(bbox.height, 100.0);
    }

    #[test]
    fn test_180_degrees_preserves_dimensions() {
        let bbox = rotated_bounding_box(100.0, 50.0, 180.0);
        assert_close(bbox.width, 100.0);
        assert_close(bbox.height, 50.0);
    }

    #[test]
    fn test_270_degrees_swaps_dimensions() {
        let bbox = rotated_bounding_box(100.0, 50.0, 270.0);
        assert_close(bbox.width, 50.0);
        assert_close(bbox.height, 100.0);
    }

    #[test]
    fn test_45_degrees_square() {
        let bbox = rotated_bounding_box(100.0, 100.0, 45.0);
        // Diagonal of a 100x100 square
        let expected = 100.0 * std::f64::consts::SQRT_2;
        assert_close(bbox.width, expected);
        assert_close(bbox.height, expected);
    }

    #[test]
    fn test_negative_rotation_matches_positive() {
        let a = rotated_bounding_box(120.0, 80.0, 30.0);
        let b = rotated_bounding_box(120.0, 80.0, -30.0);
        assert_close(a.width, b.width);
        assert_close(a.height, b.height);
    }

    #[test]
    fn test_bbox_contains_original() {
        for angle in [5.0, 17.0, 33.0, 61.0, 89.0, 121.0, 200.0, 359.0] {
            let bbox = rotated_bounding_box(200.0, 100.0, angle);
            assert!(bbox.width + TOLERANCE >= 100.0);
            assert!(bbox.height + TOLERANCE >= 100.0);
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
