//! WASM bindings for geometry helpers.

use idphoto_core::geometry::rotated_bounding_box as core_bbox;
use wasm_bindgen::prelude::*;

/// Compute the axis-aligned bounding box of a rotated rectangle.
///
/// Useful for sizing a preview element before the crop runs: the crop
/// transform stages the photo on a surface of exactly this size.
///
/// # Arguments
///
/// * `width` / `height` - Rectangle size in pixels
/// * `rotation_degrees` - Rotation angle in degrees, unnormalized
///
/// # Returns
///
/// `{ width, height }` with the exact (unrounded) box dimensions.
#[wasm_bindgen]
pub fn rotated_bounding_box(
    width: f64,
    height: f64,
    rotation_degrees: f64,
) -> Result<JsValue, JsValue> {
    let bbox = core_bbox(width, height, rotation_degrees);
    serde_wasm_bindgen::to_value(&bbox).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use idphoto_core::geometry::rotated_bounding_box as core_bbox;

    #[test]
    fn test_bbox_right_angle_swaps_dimensions() {
        let bbox = core_bbox(400.0, 200.0, 90.0);
        assert!((bbox.width - 200.0).abs() < 1e-9);
        assert!((bbox.height - 400.0).abs() < 1e-9);
    }
}

/// WASM-specific tests that require JsValue.
///
/// These tests go through the serde-wasm-bindgen boundary and can only run
/// on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Deserialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Shape of the value JavaScript receives from the binding.
    #[derive(Deserialize)]
    struct BoundingBoxJs {
        width: f64,
        height: f64,
    }

    #[wasm_bindgen_test]
    fn test_bbox_value_round_trips_to_js() {
        let value = rotated_bounding_box(400.0, 200.0, 90.0).unwrap();
        let bbox: BoundingBoxJs = serde_wasm_bindgen::from_value(value).unwrap();

        assert!((bbox.width - 200.0).abs() < 1e-9);
        assert!((bbox.height - 400.0).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn test_bbox_no_rotation() {
        let value = rotated_bounding_box(120.0, 80.0, 0.0).unwrap();
        let bbox: BoundingBoxJs = serde_wasm_bindgen::from_value(value).unwrap();

        assert!((bbox.width - 120.0).abs() < 1e-9);
        assert!((bbox.height - 80.0).abs() < 1e-9);
    }
}
