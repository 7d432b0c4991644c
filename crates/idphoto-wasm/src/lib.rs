//! Idphoto WASM - WebAssembly bindings for idphoto
//!
//! This crate exposes the idphoto-core compositing operations to
//! JavaScript/TypeScript applications. The host fetches and decodes nothing
//! itself: it hands raw file bytes to `decode_image`, calls the transform
//! bindings with the decoded image, and wraps the returned JPEG bytes in a
//! Blob / object URL on its side.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings
//! - `geometry` - Rotated bounding-box helper
//! - `photo` - The crop and background-composite transforms
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, crop_photo } from '@idphoto/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const jpeg = crop_photo(image, 0, 0, 295, 413, 0, false, false, 295, 413);
//! const url = URL.createObjectURL(new Blob([jpeg], { type: 'image/jpeg' }));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod geometry;
mod photo;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use geometry::rotated_bounding_box;
pub use photo::{create_photo, crop_photo};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&format!("idphoto wasm {} ready", version()).into());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
