//! The generation pipeline: payload in, PNG bytes out.
//!
//! A single pure, synchronous entry point composing the encoder and the
//! compositor. Every invocation allocates its own grid, raster, and logo
//! buffers, so concurrent requests need no coordination.

use crate::error::Error;
use crate::qrcode::{self, Ecc};
use crate::render::{self, RenderOptions};

/// Generates a PNG image for `payload` at the given error correction
/// level, optionally overlaying a logo decoded from `logo`.
///
/// The logo bytes may be any raster format the `image` crate can decode;
/// undecodable bytes fail with [`Error::LogoDecode`] before any encoding
/// work happens, so a failed request produces no output at all. Identical
/// inputs always produce byte-identical output.
pub fn generate_png(
    payload: &str,
    ecc: Ecc,
    options: &RenderOptions,
    logo: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    let logo = logo
        .map(|bytes| image::load_from_memory(bytes).map_err(Error::LogoDecode))
        .transpose()?;

    let grid = qrcode::encode(payload, ecc)?;
    tracing::debug!(
        version = grid.version().value(),
        modules = grid.size(),
        level = ecc.code(),
        "encoded payload"
    );

    let mut image = render::rasterize(&grid, options)?;
    if let Some(logo) = logo {
        let fraction = options
            .logo_scale
            .unwrap_or_else(|| render::logo_fraction(ecc));
        render::overlay_logo(&mut image, &logo, fraction);
        tracing::debug!(fraction = f64::from(fraction), "overlaid logo");
    }

    Ok(render::to_png(&image)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decodes a generated PNG back to its payload with an independent
    /// reader.
    fn decode_png(png: &[u8]) -> String {
        let img = image::load_from_memory(png).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    /// A small valid PNG to use as a logo in tests.
    fn sample_logo() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(64, 64, image::Rgb([0, 80, 200]));
        render::to_png(&img).unwrap()
    }

    #[test]
    fn round_trips_at_every_level() {
        for ecc in [Ecc::Low, Ecc::Medium, Ecc::Quartile, Ecc::High] {
            let png =
                generate_png("https://example.com", ecc, &RenderOptions::default(), None).unwrap();
            assert_eq!(decode_png(&png), "https://example.com");
        }
    }

    #[test]
    fn scenario_url_high_default_options() {
        let options = RenderOptions::default(); // module_size 10, border 4
        let png = generate_png("https://example.com", Ecc::High, &options, None).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (370, 370));
        assert_eq!(decode_png(&png), "https://example.com");
    }

    #[test]
    fn logo_overlay_survives_decoding_at_high() {
        let logo = sample_logo();
        let png = generate_png(
            "https://example.com",
            Ecc::High,
            &RenderOptions::default(),
            Some(&logo),
        )
        .unwrap();
        assert_eq!(decode_png(&png), "https://example.com");
    }

    #[test]
    fn undecodable_logo_fails_without_output() {
        let result = generate_png(
            "https://example.com",
            Ecc::High,
            &RenderOptions::default(),
            Some(b"definitely not an image"),
        );
        assert!(matches!(result, Err(Error::LogoDecode(_))));
    }

    #[test]
    fn truncated_logo_fails_without_output() {
        let mut logo = sample_logo();
        logo.truncate(logo.len() / 2);
        let result = generate_png(
            "https://example.com",
            Ecc::High,
            &RenderOptions::default(),
            Some(&logo),
        );
        assert!(matches!(result, Err(Error::LogoDecode(_))));
    }

    #[test]
    fn output_is_deterministic() {
        let logo = sample_logo();
        let options = RenderOptions::default();
        let a = generate_png("same input", Ecc::Quartile, &options, Some(&logo)).unwrap();
        let b = generate_png("same input", Ecc::Quartile, &options, Some(&logo)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_payload_produces_a_minimal_symbol() {
        let png = generate_png("", Ecc::High, &RenderOptions::default(), None).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        // Version 1: (21 + 8) * 10 pixels.
        assert_eq!((img.width(), img.height()), (290, 290));
    }

    #[test]
    fn oversize_payload_surfaces_encode_error() {
        let payload = "a".repeat(3000);
        let result = generate_png(&payload, Ecc::High, &RenderOptions::default(), None);
        assert!(matches!(result, Err(Error::Encode(_))));
    }
}
