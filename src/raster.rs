use anyhow::{Context, Result, anyhow, bail};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// How an SVG drawing becomes a raster file.
#[derive(Clone, Copy, Debug)]
pub struct RasterOptions {
    /// Pixels per SVG unit.
    pub scale: f32,
    /// JPEG quality, 1 to 100.
    pub quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions {
            scale: 2.0,
            quality: 90,
        }
    }
}

/// Renders an SVG document into an RGB image on a white background.
pub fn rasterize(svg: &str, options: &RasterOptions) -> Result<RgbImage> {
    if !(options.scale > 0.0 && options.scale.is_finite()) {
        bail!("scale must be a positive number, got {}", options.scale);
    }

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|err| anyhow!("failed to parse generated SVG: {err}"))?;

    let size = tree.size().to_int_size();
    let width = ((size.width() as f32) * options.scale).ceil() as u32;
    let height = ((size.height() as f32) * options.scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("failed to allocate {width}x{height} surface"))?;
    pixmap.fill(Color::WHITE);
    resvg::render(
        &tree,
        Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );

    // the background is opaque, so premultiplied and straight RGB are the same
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    RgbImage::from_raw(width, height, rgb).ok_or_else(|| anyhow!("pixel buffer has wrong size"))
}

/// Renders an SVG document and saves it as a JPEG file.
pub fn svg_to_jpeg(svg: &str, path: &Path, options: &RasterOptions) -> Result<()> {
    let image = rasterize(svg, options)?;

    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let quality = options.quality.clamp(1, 100);
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    encoder
        .encode_image(&image)
        .with_context(|| format!("cannot encode {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20\" height=\"10\" viewBox=\"0 0 20 10\">\
        <rect x=\"0\" y=\"0\" width=\"10\" height=\"10\" fill=\"#000000\"/></svg>";

    #[test]
    fn test_rasterize_size_and_background() {
        let options = RasterOptions {
            scale: 2.0,
            quality: 90,
        };
        let image = rasterize(SQUARE, &options).unwrap();
        assert_eq!(image.dimensions(), (40, 20));
        // left half black, right half white
        assert_eq!(image.get_pixel(5, 10).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(35, 10).0, [255, 255, 255]);
    }

    #[test]
    fn test_bad_input() {
        assert!(rasterize("not svg", &RasterOptions::default()).is_err());
        let flat = RasterOptions {
            scale: 0.0,
            quality: 90,
        };
        assert!(rasterize(SQUARE, &flat).is_err());
    }

    #[test]
    fn test_svg_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.jpg");
        svg_to_jpeg(SQUARE, &path, &RasterOptions::default()).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }
}
