#![forbid(unsafe_code)]

//! # qrbrand
//!
//! A QR code generator with centered logo overlays, served as PNG.
//!
//! `qrbrand` encodes text payloads (typically URLs) into QR Code Model 2
//! symbols, covering versions 1 to 40 and all four error correction
//! levels, rasterizes them with configurable module size, quiet zone and
//! colors, and can composite a logo image onto the center of the symbol
//! without breaking scannability. The result is returned as an in-memory
//! PNG buffer; a small axum server exposes the pipeline over HTTP.
//!
//! ## Example
//!
//! Generate a branded QR code as PNG bytes:
//!
//! ```rust
//! use qrbrand::pipeline::generate_png;
//! use qrbrand::qrcode::Ecc;
//! use qrbrand::render::RenderOptions;
//!
//! let png = generate_png(
//!     "https://example.com",
//!     Ecc::High,
//!     &RenderOptions::default(),
//!     None, // optional logo bytes
//! ).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: payload and level to module grid (the encoder).
//! - [`render`]: module grid to RGB raster, logo overlay, PNG bytes.
//! - [`pipeline`]: the one-call encode + composite entry point.
//! - [`error`]: the pipeline's error taxonomy.
//! - [`config`] and [`server`]: settings and the HTTP surface.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod qrcode;
pub mod render;
pub mod server;
