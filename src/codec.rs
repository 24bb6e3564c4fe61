//! Codec adapter: the only place that touches pixels.
//!
//! The compression search talks to a `Codec` and never to the `image` or
//! `oxipng` crates directly, so tests can swap in a fake encoder.

use crate::constants::{AVIF_ENCODER_SPEED, PNG_MAX_OXIPNG_PRESET};
use crate::error::{Result, ShrinkError};
use crate::formats::{EncodeParameter, OutputFormat};
use crate::resize::{Dimensions, ResizeSpec};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use oxipng::Options;
use std::path::Path;

/// Everything one encode call needs besides the pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub resize: ResizeSpec,
    pub format: OutputFormat,
    pub parameter: EncodeParameter,
}

pub trait Codec {
    /// Reads dimensions from the file header without decoding pixels
    fn read_dimensions(&self, path: &Path) -> Result<Dimensions>;

    /// Decodes the original source
    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    /// Encodes `source` with `settings`. Stateless: the resize is applied
    /// to `source` on every call.
    fn encode(&self, source: &DynamicImage, settings: &EncodeSettings) -> Result<Vec<u8>>;
}

/// Production codec backed by `image` and `oxipng`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec {
    pub filter: Option<FilterType>,
}

impl ImageCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn filter(&self) -> FilterType {
        self.filter.unwrap_or(FilterType::Lanczos3)
    }
}

/// Applies `spec` to `img`, borrowing when no resize is needed
pub fn apply_resize<'a>(
    img: &'a DynamicImage,
    spec: &ResizeSpec,
    filter: FilterType,
) -> std::borrow::Cow<'a, DynamicImage> {
    let (width, height) = img.dimensions();
    let target = spec.target_dimensions(Dimensions::new(width, height));

    if target.width == width && target.height == height {
        std::borrow::Cow::Borrowed(img)
    } else {
        std::borrow::Cow::Owned(img.resize_exact(target.width, target.height, filter))
    }
}

impl Codec for ImageCodec {
    fn read_dimensions(&self, path: &Path) -> Result<Dimensions> {
        let (width, height) =
            image::image_dimensions(path).map_err(|source| ShrinkError::MetadataRead {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Dimensions::new(width, height))
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        if !path.exists() {
            return Err(ShrinkError::FileNotFound(path.to_path_buf()));
        }
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(img)
    }

    fn encode(&self, source: &DynamicImage, settings: &EncodeSettings) -> Result<Vec<u8>> {
        let img = apply_resize(source, &settings.resize, self.filter());
        let mut buffer = Vec::new();

        match (settings.format, settings.parameter) {
            (OutputFormat::Jpeg, EncodeParameter::Quality(quality)) => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;
            }
            (OutputFormat::Avif, EncodeParameter::Quality(quality)) => {
                let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
                rgba.write_with_encoder(AvifEncoder::new_with_speed_quality(
                    &mut buffer,
                    AVIF_ENCODER_SPEED,
                    quality,
                ))?;
            }
            (OutputFormat::Png, EncodeParameter::Level(level)) => {
                img.write_with_encoder(PngEncoder::new(&mut buffer))?;

                let mut options = Options::from_preset(level.min(PNG_MAX_OXIPNG_PRESET));
                options.force = true;
                buffer = oxipng::optimize_from_memory(&buffer, &options)
                    .map_err(|e| ShrinkError::PngOptimization(e.to_string()))?;
            }
            (OutputFormat::WebP, EncodeParameter::Quality(quality)) => {
                // The `image` WebP encoder is lossless only
                let encoded = if img.color().has_alpha() {
                    let rgba = img.to_rgba8();
                    let encoded = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height())
                        .encode_simple(false, quality as f32);
                    encoded
                } else {
                    let rgb = img.to_rgb8();
                    let encoded = webp::Encoder::from_rgb(&rgb, rgb.width(), rgb.height())
                        .encode_simple(false, quality as f32);
                    encoded
                };
                buffer = encoded
                    .map_err(|e| ShrinkError::Codec(format!("WebP encode failed: {:?}", e)))?
                    .to_vec();
            }
            (format, parameter) => {
                return Err(ShrinkError::Codec(format!(
                    "{} cannot be encoded with {:?}",
                    format, parameter
                )));
            }
        }

        Ok(buffer)
    }
}
