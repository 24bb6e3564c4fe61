use crate::constants::{DEFAULT_MAX_DIMENSION, DEFAULT_TARGET_SIZE_ARG, MAX_REQUESTED_DIMENSION};
use crate::error::{Result, ShrinkError};
use crate::formats::OutputFormat;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    name = "img-shrink",
    about = "Shrink every image in a directory under a target file size",
    long_about = "img-shrink walks a directory and re-encodes each image so it fits under a byte budget. \
                  A starting quality is estimated from how much the file has to shrink, then lowered \
                  step by step until the output fits. Images are resized to fit a maximum dimension \
                  unless an explicit width or height is given.",
    version,
    after_help = "SETTINGS:\n  \
    w=<int>      target width (keeps aspect ratio when used alone)\n  \
    h=<int>      target height (keeps aspect ratio when used alone)\n  \
    t=<format>   output format: jpeg, png, webp, avif\n\n\
    EXAMPLES:\n  \
    img-shrink ./photos\n  \
    img-shrink ./photos w=800 -s 200KB\n  \
    img-shrink ./photos w=800 h=800 t=webp -r"
)]
pub struct Args {
    #[arg(
        value_name = "DIR|SETTING",
        help = "Input directory (default: .) followed by w=, h=, t= settings"
    )]
    pub inputs: Vec<String>,

    #[arg(
        short = 's',
        long,
        default_value = DEFAULT_TARGET_SIZE_ARG,
        help = "Target size per file (e.g. 100KB, 1.5MB, 204800)",
        long_help = "Byte budget for every output file. Accepts plain bytes or a KB/MB/GB suffix \
                     (1KB = 1024 bytes). Files already under budget are skipped unless a resize \
                     or format conversion is requested."
    )]
    pub target_size: String,

    #[arg(
        short = 'm',
        long,
        default_value_t = DEFAULT_MAX_DIMENSION,
        help = "Fit images inside a square of this many pixels (0 disables)",
        long_help = "Applies only when neither w= nor h= is given. Images are never enlarged."
    )]
    pub max_dimension: u32,

    #[arg(short = 'r', long, help = "Process subdirectories recursively")]
    pub recursive: bool,

    #[arg(
        short = 'n',
        long,
        help = "Show what would be done without writing anything"
    )]
    pub dry_run: bool,

    #[arg(short = 'q', long, help = "Only print errors", conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print every encode attempt")]
    pub verbose: bool,
}

/// A `key=value` setting given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Width(u32),
    Height(u32),
    Format(OutputFormat),
}

impl FromStr for Setting {
    type Err = ShrinkError;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| ShrinkError::InvalidSetting(s.to_string()))?;
        let invalid = || ShrinkError::InvalidSetting(s.to_string());
        let dimension = || {
            value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|d| *d <= MAX_REQUESTED_DIMENSION)
                .ok_or_else(invalid)
        };

        match key.trim().to_lowercase().as_str() {
            "w" => dimension().map(Setting::Width),
            "h" => dimension().map(Setting::Height),
            "t" => OutputFormat::from_str(value.trim()).map(Setting::Format),
            _ => Err(invalid()),
        }
    }
}

/// Whether a positional token looks like a setting rather than a path
pub fn is_setting_token(token: &str) -> bool {
    token
        .split_once('=')
        .map(|(key, _)| matches!(key.to_lowercase().as_str(), "w" | "h" | "t"))
        .unwrap_or(false)
}

/// Splits positional tokens into the input directory and the settings
pub fn split_inputs(inputs: &[String]) -> Result<(Option<PathBuf>, Vec<Setting>)> {
    let mut dir = None;
    let mut settings = Vec::new();

    for token in inputs {
        if is_setting_token(token) {
            settings.push(Setting::from_str(token)?);
        } else if dir.is_none() {
            dir = Some(PathBuf::from(token));
        } else {
            return Err(ShrinkError::InvalidSetting(token.clone()));
        }
    }

    Ok((dir, settings))
}

/// Parses a human size such as `100KB`, `1.5mb` or `204800` into bytes
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let invalid = || ShrinkError::InvalidTargetSize(input.to_string());

    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: f64 = number.parse().map_err(|_| invalid())?;
    let multiplier: u64 = match unit.trim().to_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => 1024,
        "m" | "mb" | "mib" => 1024 * 1024,
        "g" | "gb" | "gib" => 1024 * 1024 * 1024,
        _ => return Err(invalid()),
    };

    let bytes = (value * multiplier as f64).round();
    if !bytes.is_finite() || bytes < 1.0 {
        return Err(invalid());
    }
    Ok(bytes as u64)
}
