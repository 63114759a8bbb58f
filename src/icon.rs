// ============================================================================
// icon.rs — PNG → multi-size ICO packing (image + ico backends)
// ============================================================================

use std::path::Path;

use indicatif::ProgressBar;

use crate::error::{IconError, Result};

/// One image stored in an ICO directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconEntry {
    pub width: u32,
    pub height: u32,
}

/// Re-encodes the raster image at `png_path` as an ICO holding one entry per
/// size in `sizes`. The file at `ico_path` is only replaced once the whole
/// container has been encoded.
///
/// `progress` is advanced once per encoded size when given.
pub fn convert_png_to_ico(
    png_path: &Path,
    ico_path: &Path,
    sizes: &[u32],
    progress: Option<&ProgressBar>,
) -> Result<Vec<IconEntry>> {
    let (bytes, entries) = encode_ico_from_png(png_path, sizes, progress).map_err(|e| {
        tracing::error!(error = %e, "PNG to ICO conversion failed");
        e
    })?;
    crate::utils::write_atomic(ico_path, &bytes)?;
    tracing::debug!(path = %ico_path.display(), entries = entries.len(), bytes = bytes.len(), "wrote ICO");
    Ok(entries)
}

#[cfg(feature = "ico")]
pub fn encode_ico_from_png(
    png_path: &Path,
    sizes: &[u32],
    progress: Option<&ProgressBar>,
) -> Result<(Vec<u8>, Vec<IconEntry>)> {
    use image::imageops::FilterType;
    use rayon::prelude::*;

    let sizes = crate::config::normalize_sizes(sizes)?;

    let data = std::fs::read(png_path).map_err(|e| IconError::io(png_path, e))?;
    let source = image::load_from_memory(&data).map_err(|e| IconError::Decode {
        path: png_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let (src_w, src_h) = (source.width(), source.height());
    let usable: Vec<u32> = sizes
        .iter()
        .copied()
        .filter(|&s| {
            let fits = s <= src_w && s <= src_h;
            if !fits {
                tracing::warn!(size = s, src_w, src_h, "skipping icon size larger than source image");
            }
            fits
        })
        .collect();

    if usable.is_empty() {
        return Err(IconError::Decode {
            path: png_path.to_path_buf(),
            message: format!("source image {}x{} is smaller than every icon size", src_w, src_h),
        });
    }

    // Resizes are independent; collect() keeps them in size order.
    let encoded: Vec<Result<ico::IconDirEntry>> = usable
        .par_iter()
        .map(|&size| {
            let rgba = if size == src_w && size == src_h {
                source.to_rgba8()
            } else {
                source.resize_exact(size, size, FilterType::Lanczos3).to_rgba8()
            };
            let image = ico::IconImage::from_rgba_data(size, size, rgba.into_raw());
            let entry = ico::IconDirEntry::encode(&image).map_err(|e| IconError::Encode {
                what: format!("{}x{} icon", size, size),
                message: e.to_string(),
            });
            if let Some(pb) = progress {
                pb.inc(1);
            }
            entry
        })
        .collect();

    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
    let mut entries = Vec::with_capacity(encoded.len());
    for entry in encoded {
        let entry = entry?;
        entries.push(IconEntry {
            width: entry.width(),
            height: entry.height(),
        });
        icon_dir.add_entry(entry);
    }

    let mut bytes = Vec::new();
    icon_dir.write(&mut bytes).map_err(|e| IconError::Encode {
        what: "ICO".to_string(),
        message: e.to_string(),
    })?;
    Ok((bytes, entries))
}

#[cfg(not(feature = "ico"))]
pub fn encode_ico_from_png(
    _png_path: &Path,
    _sizes: &[u32],
    _progress: Option<&ProgressBar>,
) -> Result<(Vec<u8>, Vec<IconEntry>)> {
    Err(IconError::MissingBackends(vec![crate::deps::Backend::Ico]))
}

/// Lists the entries of an existing ICO file in file order.
#[cfg(feature = "ico")]
pub fn inspect_ico(ico_path: &Path) -> Result<Vec<IconEntry>> {
    let file = std::fs::File::open(ico_path).map_err(|e| IconError::io(ico_path, e))?;
    let icon_dir = ico::IconDir::read(std::io::BufReader::new(file)).map_err(|e| IconError::InvalidIcon {
        path: ico_path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(icon_dir
        .entries()
        .iter()
        .map(|e| IconEntry {
            width: e.width(),
            height: e.height(),
        })
        .collect())
}

#[cfg(not(feature = "ico"))]
pub fn inspect_ico(_ico_path: &Path) -> Result<Vec<IconEntry>> {
    Err(IconError::MissingBackends(vec![crate::deps::Backend::Ico]))
}

#[cfg(all(test, feature = "ico"))]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ICO_SIZES;
    use image::{Rgba, RgbaImage};

    fn write_test_png(path: &Path, size: u32) {
        let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
        for y in size / 4..size * 3 / 4 {
            for x in size / 4..size * 3 / 4 {
                img.put_pixel(x, y, Rgba([220, 40, 40, 255]));
            }
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_six_standard_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("app_icon.png");
        let ico = dir.path().join("app_icon.ico");
        write_test_png(&png, 256);

        let entries = convert_png_to_ico(&png, &ico, &DEFAULT_ICO_SIZES, None).unwrap();
        let dims: Vec<(u32, u32)> = entries.iter().map(|e| (e.width, e.height)).collect();
        assert_eq!(
            dims,
            vec![(16, 16), (32, 32), (48, 48), (64, 64), (128, 128), (256, 256)]
        );
        assert_eq!(inspect_ico(&ico).unwrap(), entries);
    }

    #[test]
    fn test_sizes_larger_than_source_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("small.png");
        let ico = dir.path().join("small.ico");
        write_test_png(&png, 48);

        let entries = convert_png_to_ico(&png, &ico, &DEFAULT_ICO_SIZES, None).unwrap();
        let widths: Vec<u32> = entries.iter().map(|e| e.width).collect();
        assert_eq!(widths, vec![16, 32, 48]);
    }

    #[test]
    fn test_corrupt_png_leaves_existing_ico() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("app_icon.png");
        let ico = dir.path().join("app_icon.ico");
        std::fs::write(&png, b"\x89PNG\r\n\x1a\nnot really a png").unwrap();
        std::fs::write(&ico, b"previous icon").unwrap();

        let err = convert_png_to_ico(&png, &ico, &DEFAULT_ICO_SIZES, None).unwrap_err();
        assert!(matches!(err, IconError::Decode { .. }));
        assert_eq!(std::fs::read(&ico).unwrap(), b"previous icon");
    }

    #[test]
    fn test_progress_counts_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("app_icon.png");
        write_test_png(&png, 256);
        let pb = ProgressBar::hidden();
        encode_ico_from_png(&png, &DEFAULT_ICO_SIZES, Some(&pb)).unwrap();
        assert_eq!(pb.position(), 6);
    }

    #[test]
    fn test_inspect_rejects_non_icon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.ico");
        std::fs::write(&path, b"definitely not an icon").unwrap();
        let err = inspect_ico(&path).unwrap_err();
        assert!(matches!(err, IconError::InvalidIcon { .. }));
        assert!(err.to_string().starts_with("Not a valid ICO file"));
    }

    #[test]
    fn test_deterministic_output() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("app_icon.png");
        write_test_png(&png, 256);
        let (a, _) = encode_ico_from_png(&png, &DEFAULT_ICO_SIZES, None).unwrap();
        let (b, _) = encode_ico_from_png(&png, &DEFAULT_ICO_SIZES, None).unwrap();
        assert_eq!(a, b);
    }
}
