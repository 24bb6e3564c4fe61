//! Image format handling and per-format encoding parameter strategies
//!
//! Every output format maps to a `ParameterStrategy` through `PARAMETER_TABLE`.
//! The compression search only ever lowers one quality scalar; the strategy
//! decides what that scalar means to the codec.

use crate::constants::{EXCLUDED_SOURCE_EXTENSIONS, SUPPORTED_SOURCE_EXTENSIONS};
use crate::error::{Result, ShrinkError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats the encoder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// JPEG, lossy, quality driven
    Jpeg,
    /// PNG, lossless, effort driven through oxipng
    Png,
    /// WebP, lossy, quality driven through libwebp
    WebP,
    /// AVIF, lossy, quality driven
    Avif,
}

/// How the quality scalar is handed to the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStrategy {
    /// Higher quality score means a larger, better output
    Quality,
    /// Effort level rises as quality falls: `(100 - quality) / 10`
    EffortLevel,
}

/// Concrete parameter for a single encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParameter {
    Quality(u8),
    Level(u8),
}

pub const PARAMETER_TABLE: &[(OutputFormat, ParameterStrategy)] = &[
    (OutputFormat::Jpeg, ParameterStrategy::Quality),
    (OutputFormat::Avif, ParameterStrategy::Quality),
    (OutputFormat::Png, ParameterStrategy::EffortLevel),
    (OutputFormat::WebP, ParameterStrategy::Quality),
];

impl ParameterStrategy {
    /// Translate the shared quality scalar into this strategy's parameter
    pub fn parameter(self, quality: u8) -> EncodeParameter {
        match self {
            ParameterStrategy::Quality => EncodeParameter::Quality(quality.clamp(1, 100)),
            ParameterStrategy::EffortLevel => {
                EncodeParameter::Level((100 - quality.min(100)) / 10)
            }
        }
    }
}

impl OutputFormat {
    /// Returns the canonical file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    /// Looks the format up in `PARAMETER_TABLE`
    pub fn strategy(&self) -> ParameterStrategy {
        PARAMETER_TABLE
            .iter()
            .find(|(format, _)| format == self)
            .map(|(_, strategy)| *strategy)
            .unwrap_or(ParameterStrategy::Quality)
    }

    pub fn all_formats() -> Vec<OutputFormat> {
        vec![
            OutputFormat::Jpeg,
            OutputFormat::Png,
            OutputFormat::WebP,
            OutputFormat::Avif,
        ]
    }

    /// Format a source file already is, if it is one we can also write
    pub fn from_path(path: &Path) -> Option<OutputFormat> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "avif" => Some(OutputFormat::Avif),
            _ => None,
        }
    }

    /// Format used when no `t=` setting is given.
    ///
    /// PNG sources become JPEG, everything else keeps its own format.
    /// Sources we cannot write back (TIFF, BMP) fall back to JPEG.
    pub fn default_for_source(path: &Path) -> OutputFormat {
        match OutputFormat::from_path(path) {
            Some(OutputFormat::Png) | None => OutputFormat::Jpeg,
            Some(format) => format,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Avif => "AVIF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = ShrinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            "avif" => Ok(OutputFormat::Avif),
            _ => Err(ShrinkError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Check if a path carries an extension from the source allow-list
pub fn is_supported_source(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_SOURCE_EXTENSIONS.contains(&ext_lower.as_str())
                && !EXCLUDED_SOURCE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}
