//! Rasterization and logo compositing.
//!
//! Turns a [`ModuleGrid`] into an RGB pixel image (each module becomes a
//! square block of fill or background color, surrounded by a quiet-zone
//! border), optionally pastes a centered logo over it, and serializes the
//! result as PNG into an in-memory buffer.

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageBuffer, ImageEncoder, Rgb, RgbImage};

use crate::error::RenderError;
use crate::qrcode::{Ecc, ModuleGrid, QUIET_ZONE};

/// Logo fraction of the image width used by the original service, tied to
/// the High error correction level.
pub const BASE_LOGO_FRACTION: f32 = 0.2;

/// Upper bound on the rendered image side, in pixels. A version-40 symbol
/// at the default module size is under 2000 pixels, so this leaves ample
/// headroom while keeping the pixel buffer well under a gigabyte.
pub const MAX_IMAGE_SIDE: u32 = 1 << 14;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a color specification: either a name from the supported
    /// table or a `#rgb` / `#rrggbb` hex value. Case-insensitive. Unknown
    /// names and malformed hex fail fast with a [`RenderError`].
    pub fn parse(value: &str) -> Result<Self, RenderError> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| RenderError::InvalidHexColor(value.into()));
        }
        // The common CSS/PIL names; anything fancier should be spelled in hex.
        let color = match value.to_ascii_lowercase().as_str() {
            "black" => Color::rgb(0, 0, 0),
            "white" => Color::rgb(255, 255, 255),
            "red" => Color::rgb(255, 0, 0),
            "green" => Color::rgb(0, 128, 0),
            "lime" => Color::rgb(0, 255, 0),
            "blue" => Color::rgb(0, 0, 255),
            "yellow" => Color::rgb(255, 255, 0),
            "cyan" | "aqua" => Color::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
            "orange" => Color::rgb(255, 165, 0),
            "purple" => Color::rgb(128, 0, 128),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "silver" => Color::rgb(192, 192, 192),
            "maroon" => Color::rgb(128, 0, 0),
            "olive" => Color::rgb(128, 128, 0),
            "navy" => Color::rgb(0, 0, 128),
            "teal" => Color::rgb(0, 128, 128),
            "pink" => Color::rgb(255, 192, 203),
            "brown" => Color::rgb(165, 42, 42),
            "gold" => Color::rgb(255, 215, 0),
            other => return Err(RenderError::UnknownColor(other.into())),
        };
        Ok(color)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let expand = |n: u8| n << 4 | n;
        match hex.len() {
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                Some(Color::rgb(
                    expand((v >> 8) as u8 & 0xf),
                    expand((v >> 4) as u8 & 0xf),
                    expand(v as u8 & 0xf),
                ))
            }
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Color::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            _ => None,
        }
    }

    fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Rendering parameters for [`rasterize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Pixels per module side. Must be positive.
    pub module_size: u32,
    /// Quiet-zone width in modules on each side. Zero is legal but makes
    /// the symbol hard to scan.
    pub border: u32,
    /// Module (foreground) color.
    pub fill: Color,
    /// Background and quiet-zone color.
    pub back: Color,
    /// Explicit logo fraction of the image width; `None` derives it from
    /// the error correction level, see [`logo_fraction`].
    pub logo_scale: Option<f32>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 10,
            border: QUIET_ZONE,
            fill: Color::BLACK,
            back: Color::WHITE,
            logo_scale: None,
        }
    }
}

/// Default logo fraction of the image width for the given level.
///
/// The original service always used [`BASE_LOGO_FRACTION`] of the width.
/// A logo that size eats a fixed share of the damage budget, which only
/// the High level is sure to afford, so the fraction is anchored at High
/// and shrinks with the square root of the level's tolerance (module
/// damage grows with logo area, area with the square of the side).
pub fn logo_fraction(ecc: Ecc) -> f32 {
    BASE_LOGO_FRACTION * (ecc.tolerance() / Ecc::High.tolerance()).sqrt()
}

/// Rasterizes a module grid into an RGB image.
///
/// Every module becomes a `module_size` x `module_size` block; `border`
/// modules of background color surround the symbol on all four sides, so
/// the image is `(grid + 2 * border) * module_size` pixels on a side.
/// Options whose product overflows or exceeds [`MAX_IMAGE_SIDE`] are
/// rejected before any pixels are allocated; a corrupted or truncated
/// image is never returned.
pub fn rasterize(grid: &ModuleGrid, options: &RenderOptions) -> Result<RgbImage, RenderError> {
    if options.module_size == 0 {
        return Err(RenderError::ZeroModuleSize);
    }
    let fill = Rgb(options.fill.channels());
    let back = Rgb(options.back.channels());
    let side = options
        .border
        .checked_mul(2)
        .and_then(|b| b.checked_add(grid.size() as u32))
        .and_then(|modules| modules.checked_mul(options.module_size))
        .filter(|&side| side <= MAX_IMAGE_SIDE)
        .ok_or(RenderError::ImageTooLarge {
            limit: MAX_IMAGE_SIDE,
        })?;

    let mut img = ImageBuffer::from_pixel(side, side, back);
    for (px, py, pixel) in img.enumerate_pixels_mut() {
        let x = (px / options.module_size) as i32 - options.border as i32;
        let y = (py / options.module_size) as i32 - options.border as i32;
        if grid.module(x, y) {
            *pixel = fill;
        }
    }
    Ok(img)
}

/// Pastes `logo` over the center of `image`.
///
/// The logo is scaled, aspect ratio preserved and never upscaled, so its
/// longer dimension is `fraction` of the image width, using Lanczos3
/// resampling to avoid artifacts a scanner could mistake for modules. The
/// paste is opaque: underlying modules are overwritten, and the chosen
/// error correction level must cover the lost area.
pub fn overlay_logo(image: &mut RgbImage, logo: &DynamicImage, fraction: f32) {
    let fraction = fraction.clamp(0.0, 1.0);
    let (w, h) = scaled_logo_dims(image.width(), logo.width(), logo.height(), fraction);
    let scaled = if (w, h) == (logo.width(), logo.height()) {
        logo.to_rgb8()
    } else {
        logo.resize_exact(w, h, FilterType::Lanczos3).to_rgb8()
    };
    let (x, y) = paste_origin(
        (image.width(), image.height()),
        (scaled.width(), scaled.height()),
    );
    imageops::replace(image, &scaled, x, y);
}

/// Target dimensions for the logo: longer side equals `fraction` of the
/// canvas width, aspect ratio preserved, never upscaled.
fn scaled_logo_dims(canvas_width: u32, logo_w: u32, logo_h: u32, fraction: f32) -> (u32, u32) {
    let target = ((canvas_width as f32 * fraction).round() as u32).max(1);
    let longer = logo_w.max(logo_h);
    if longer <= target {
        return (logo_w, logo_h);
    }
    let scale = target as f32 / longer as f32;
    let w = ((logo_w as f32 * scale).round() as u32).max(1);
    let h = ((logo_h as f32 * scale).round() as u32).max(1);
    (w, h)
}

/// Top-left paste coordinate that centers a `(w, h)` overlay on a
/// `(width, height)` canvas.
fn paste_origin(canvas: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
    let x = (canvas.0.saturating_sub(overlay.0) / 2) as i64;
    let y = (canvas.1.saturating_sub(overlay.1) / 2) as i64;
    (x, y)
}

/// Losslessly serializes the raster into an in-memory PNG buffer.
pub fn to_png(image: &RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut buf: Vec<u8> = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qrcode::{encode, Ecc};

    #[test]
    fn named_and_hex_colors_parse() {
        assert_eq!(Color::parse("black").unwrap(), Color::rgb(0, 0, 0));
        assert_eq!(Color::parse("WHITE").unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(Color::parse("Orange").unwrap(), Color::rgb(255, 165, 0));
        assert_eq!(Color::parse("#ff8800").unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(Color::parse("#f80").unwrap(), Color::rgb(255, 136, 0));
    }

    #[test]
    fn invalid_colors_are_rejected() {
        assert!(matches!(
            Color::parse("notacolor"),
            Err(RenderError::UnknownColor(_))
        ));
        assert!(matches!(
            Color::parse("#12345"),
            Err(RenderError::InvalidHexColor(_))
        ));
        assert!(matches!(
            Color::parse("#gggggg"),
            Err(RenderError::InvalidHexColor(_))
        ));
    }

    #[test]
    fn raster_dimensions_follow_grid_and_options() {
        let grid = encode("https://example.com", Ecc::High).unwrap();
        let options = RenderOptions::default();
        let img = rasterize(&grid, &options).unwrap();
        // Version 3 is 29 modules; (29 + 2*4) * 10 = 370.
        assert_eq!(img.dimensions(), (370, 370));
    }

    #[test]
    fn zero_module_size_is_rejected() {
        let grid = encode("x", Ecc::Low).unwrap();
        let options = RenderOptions {
            module_size: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            rasterize(&grid, &options),
            Err(RenderError::ZeroModuleSize)
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let grid = encode("x", Ecc::Low).unwrap();
        // Overflows u32 when doubled.
        let overflowing_border = RenderOptions {
            border: 2_147_483_648,
            ..RenderOptions::default()
        };
        assert!(matches!(
            rasterize(&grid, &overflowing_border),
            Err(RenderError::ImageTooLarge { .. })
        ));
        // Overflows in the final multiplication.
        let overflowing_module = RenderOptions {
            module_size: u32::MAX,
            ..RenderOptions::default()
        };
        assert!(matches!(
            rasterize(&grid, &overflowing_module),
            Err(RenderError::ImageTooLarge { .. })
        ));
        // No overflow, but past the side limit: (21 + 10000) * 10 pixels.
        let merely_large = RenderOptions {
            border: 5000,
            ..RenderOptions::default()
        };
        assert!(matches!(
            rasterize(&grid, &merely_large),
            Err(RenderError::ImageTooLarge { .. })
        ));
        // The largest symbol at the default options still renders.
        let sane = RenderOptions::default();
        assert!(rasterize(&grid, &sane).is_ok());
    }

    #[test]
    fn quiet_zone_pixels_are_background() {
        let grid = encode("hello", Ecc::Medium).unwrap();
        let options = RenderOptions::default();
        let img = rasterize(&grid, &options).unwrap();
        // The border ring must be pure background.
        let back = Rgb(options.back.channels());
        assert_eq!(*img.get_pixel(0, 0), back);
        assert_eq!(*img.get_pixel(img.width() - 1, img.height() - 1), back);
        // The top-left finder corner, just inside the border, is fill.
        let b = options.border * options.module_size;
        assert_eq!(*img.get_pixel(b, b), Rgb(options.fill.channels()));
    }

    #[test]
    fn logo_is_scaled_down_preserving_aspect() {
        assert_eq!(scaled_logo_dims(290, 100, 50, 0.2), (58, 29));
        assert_eq!(scaled_logo_dims(290, 50, 100, 0.2), (29, 58));
        // Already small enough: left untouched, never upscaled.
        assert_eq!(scaled_logo_dims(100, 10, 5, 0.2), (10, 5));
    }

    #[test]
    fn paste_origin_centers_the_overlay() {
        assert_eq!(paste_origin((370, 370), (74, 74)), (148, 148));
        assert_eq!(paste_origin((100, 100), (21, 21)), (39, 39));
        // Degenerate: overlay as large as the canvas sits at the origin.
        assert_eq!(paste_origin((50, 50), (50, 50)), (0, 0));
    }

    #[test]
    fn overlay_is_centered_and_opaque() {
        let mut canvas: RgbImage = ImageBuffer::from_pixel(100, 100, Rgb([255, 255, 255]));
        let logo = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(30, 30, Rgb([255, 0, 0])));
        overlay_logo(&mut canvas, &logo, 0.2);
        // Scaled to 20x20, pasted at (40, 40).
        assert_eq!(*canvas.get_pixel(50, 50), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(40, 40), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(59, 59), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(39, 39), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(60, 60), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn default_logo_fraction_tracks_the_level() {
        assert!((logo_fraction(Ecc::High) - BASE_LOGO_FRACTION).abs() < 1e-6);
        assert!(logo_fraction(Ecc::Low) < logo_fraction(Ecc::Medium));
        assert!(logo_fraction(Ecc::Medium) < logo_fraction(Ecc::Quartile));
        assert!(logo_fraction(Ecc::Quartile) < logo_fraction(Ecc::High));
    }

    #[test]
    fn png_bytes_carry_the_signature() {
        let img: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0]));
        let png = to_png(&img).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }
}
