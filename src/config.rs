use crate::cli::{parse_size, split_inputs, Args, Setting};
use crate::constants::{DEFAULT_MAX_DIMENSION, DEFAULT_TARGET_SIZE};
use crate::error::Result;
use crate::formats::OutputFormat;
use crate::search::CompressionRequest;
use std::path::{Path, PathBuf};

/// Run configuration. Built once from the command line and passed by
/// reference to the batch driver, planner and search; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkConfig {
    pub input_dir: PathBuf,
    pub target_size: u64,
    pub max_dimension: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<OutputFormat>,
    pub recursive: bool,
    pub dry_run: bool,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            target_size: DEFAULT_TARGET_SIZE,
            max_dimension: DEFAULT_MAX_DIMENSION,
            width: None,
            height: None,
            format: None,
            recursive: false,
            dry_run: false,
        }
    }
}

impl ShrinkConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let (dir, settings) = split_inputs(&args.inputs)?;
        let mut config = Self {
            input_dir: dir.unwrap_or_else(|| PathBuf::from(".")),
            target_size: parse_size(&args.target_size)?,
            max_dimension: args.max_dimension,
            recursive: args.recursive,
            dry_run: args.dry_run,
            ..Self::default()
        };

        // Later settings win
        for setting in settings {
            match setting {
                Setting::Width(w) => config.width = Some(w).filter(|&w| w > 0),
                Setting::Height(h) => config.height = Some(h).filter(|&h| h > 0),
                Setting::Format(format) => config.format = Some(format),
            }
        }

        Ok(config)
    }

    pub fn resize_requested(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Explicit `t=` that differs from the source's own format
    pub fn conversion_requested(&self, source: &Path) -> bool {
        match self.format {
            Some(format) => OutputFormat::from_path(source) != Some(format),
            None => false,
        }
    }

    pub fn output_format_for(&self, source: &Path) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::default_for_source(source))
    }

    /// Files already under budget are left alone unless the user asked for
    /// new geometry or a new format.
    pub fn should_skip(&self, source: &Path, original_size: u64) -> bool {
        original_size <= self.target_size
            && !self.resize_requested()
            && !self.conversion_requested(source)
    }

    pub fn request_for(&self, source: &Path, original_size: u64) -> CompressionRequest {
        CompressionRequest {
            source_path: source.to_path_buf(),
            original_size,
            target_size: self.target_size,
            requested_width: self.width,
            requested_height: self.height,
            max_dimension: self.max_dimension,
            target_format: self.output_format_for(source),
        }
    }
}
