// ============================================================================
// render.rs — SVG → PNG rasterization (resvg backend)
// ============================================================================

use std::path::Path;

use crate::error::{IconError, Result};

/// Rasterizes `svg_path` to a `size`×`size` PNG at `png_path`.
///
/// The drawing is scaled uniformly to fit the square and centered; the rest
/// stays transparent. Nothing is written unless rendering succeeds.
pub fn convert_svg_to_png(svg_path: &Path, png_path: &Path, size: u32) -> Result<()> {
    let png = render_svg_to_png_bytes(svg_path, size).map_err(|e| {
        tracing::error!(error = %e, "SVG to PNG conversion failed");
        e
    })?;
    crate::utils::write_atomic(png_path, &png)?;
    tracing::debug!(path = %png_path.display(), size, bytes = png.len(), "wrote PNG");
    Ok(())
}

#[cfg(feature = "svg")]
pub fn render_svg_to_png_bytes(svg_path: &Path, size: u32) -> Result<Vec<u8>> {
    use resvg::{tiny_skia, usvg};

    let render_err = |message: String| IconError::Render {
        path: svg_path.to_path_buf(),
        message,
    };

    if size == 0 || size > crate::config::MAX_PNG_SIZE {
        return Err(IconError::InvalidRenderSize(size));
    }

    let data = std::fs::read(svg_path).map_err(|e| IconError::io(svg_path, e))?;

    let mut opt = usvg::Options::default();
    // Relative <image href> resolve against the SVG's directory
    opt.resources_dir = svg_path.parent().map(|p| p.to_path_buf());
    // Without fonts every <text> element is dropped
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_data(&data, &opt).map_err(|e| render_err(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| render_err(format!("cannot allocate {}x{} canvas", size, size)))?;

    let (w, h) = (tree.size().width(), tree.size().height());
    let scale = size as f32 / w.max(h);
    let dx = (size as f32 - w * scale) / 2.0;
    let dy = (size as f32 - h * scale) / 2.0;
    let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| IconError::Encode {
        what: "PNG".to_string(),
        message: e.to_string(),
    })
}

#[cfg(not(feature = "svg"))]
pub fn render_svg_to_png_bytes(_svg_path: &Path, _size: u32) -> Result<Vec<u8>> {
    Err(IconError::MissingBackends(vec![crate::deps::Backend::Svg]))
}
