//! render::raster
//!
//! Async PNG export of rendered markup.
//!
//! # Suspension Points
//!
//! Export runs in two sequential steps, each on a blocking worker so the
//! caller's thread is never blocked:
//! 1. Decode the markup into a render tree ([`RasterError::Decode`] on failure)
//! 2. Draw the tree into a square surface and encode it as PNG
//!    ([`RasterError::Surface`] or [`RasterError::Draw`] on failure)
//!
//! The drawing surface is owned by the second worker and released on every
//! exit path. No timeout is applied here; callers that need one should wrap
//! the future in `tokio::time::timeout`.
//!
//! # Example
//!
//! ```no_run
//! use qbc::render::raster::rasterize;
//!
//! # async fn example() -> Result<(), qbc::render::raster::RasterError> {
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
//! let image = rasterize(svg, 64).await?;
//! assert_eq!(image.width, 64);
//! # Ok(())
//! # }
//! ```

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use thiserror::Error;

pub use crate::core::config::schema::{DEFAULT_RASTER_SIZE, MAX_RASTER_SIZE};

/// Errors from raster export.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to decode source markup: {0}")]
    Decode(String),

    #[error("failed to allocate a {0}x{0} drawing surface")]
    Surface(u32),

    #[error("failed to produce raster: {0}")]
    Draw(String),

    #[error("raster worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// A rendered PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded bytes
    pub png: Vec<u8>,
}

/// Rasterize SVG markup into a `size` x `size` PNG.
///
/// The markup is scaled to fill the surface.
pub async fn rasterize(markup: impl Into<String>, size: u32) -> Result<RasterImage, RasterError> {
    let markup = markup.into();

    let tree = tokio::task::spawn_blocking(move || decode_markup(&markup)).await??;

    tokio::task::spawn_blocking(move || draw(&tree, size)).await?
}

fn decode_markup(markup: &str) -> Result<Tree, RasterError> {
    Tree::from_str(markup, &Options::default()).map_err(|e| RasterError::Decode(e.to_string()))
}

fn draw(tree: &Tree, size: u32) -> Result<RasterImage, RasterError> {
    if size == 0 || size > MAX_RASTER_SIZE {
        return Err(RasterError::Surface(size));
    }
    let mut pixmap = Pixmap::new(size, size).ok_or(RasterError::Surface(size))?;

    let bounds = tree.size();
    let transform = Transform::from_scale(
        size as f32 / bounds.width(),
        size as f32 / bounds.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|e| RasterError::Draw(e.to_string()))?;

    Ok(RasterImage {
        width: size,
        height: size,
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[tokio::test]
    async fn rasterizes_simple_markup() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
            <rect width="20" height="20" fill="#ff0000"/>
        </svg>"##;
        let image = rasterize(svg, 32).await.unwrap();
        assert_eq!((image.width, image.height), (32, 32));
        assert!(image.png.starts_with(&PNG_SIGNATURE));
    }

    #[tokio::test]
    async fn bad_markup_is_decode_error() {
        let err = rasterize("definitely not svg", 32).await.unwrap_err();
        assert!(matches!(err, RasterError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn zero_surface_is_surface_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
            <rect width="10" height="10"/>
        </svg>"#;
        let err = rasterize(svg, 0).await.unwrap_err();
        assert!(matches!(err, RasterError::Surface(0)), "got {err:?}");
    }
}
