//! Idphoto Core - Identification-photo compositing library
//!
//! This crate provides the core compositing functionality for idphoto:
//! cropping a rotated region of a source photograph to a target resolution,
//! and compositing a subject photo over a flat or radial-gradient background.
//!
//! Both operations are built on an injected drawing-surface capability
//! ([`surface::SurfaceFactory`]), so the core runs unchanged against the
//! bundled software rasterizer or any host-provided 2D surface.

pub mod color;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod handle;
pub mod loader;
pub mod photo;
pub mod surface;

pub use geometry::{degrees_to_radians, rotated_bounding_box, BoundingBox};
pub use handle::{BlobRegistry, MemoryBlobRegistry, OutputHandle};
pub use loader::{ImageSource, LoadError, MemorySource};
pub use photo::{
    create_id_photo, crop_id_photo, render_composite, render_crop, CompositeRequest, CropRequest,
    PhotoError,
};

/// Target output size in pixels for a transform.
///
/// Both dimensions must be positive for a usable output; zero dimensions are
/// passed through and fail at encode time, the same way a zero-sized canvas
/// produces no blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rectangular region to sample from the rotated source surface.
///
/// Coordinates are in source-surface pixels. Values are not validated;
/// regions extending outside the surface sample transparent pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropArea {
    /// Left edge in surface pixels
    pub x: f64,
    /// Top edge in surface pixels
    pub y: f64,
    /// Region width in surface pixels
    pub width: f64,
    /// Region height in surface pixels
    pub height: f64,
}

impl CropArea {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Optional mirroring applied between the rotate and recenter steps of the
/// crop transform. Inert by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Flip {
    /// Mirror across the vertical axis
    pub horizontal: bool,
    /// Mirror across the horizontal axis
    pub vertical: bool,
}

impl Flip {
    /// Check whether any mirroring is requested.
    pub fn is_none(&self) -> bool {
        !self.horizontal && !self.vertical
    }
}
