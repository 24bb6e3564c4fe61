use crate::codec::{Codec, ImageCodec};
use crate::config::ShrinkConfig;
use crate::constants::{PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE, SKIP_PREFIX, SUCCESS_PREFIX};
use crate::error::{Result, ShrinkError};
use crate::formats::{is_supported_source, OutputFormat};
use crate::resize::Dimensions;
use crate::search::compress_to_target;
use crate::utils::{calculate_compression_ratio, format_file_size};
use crate::{error, info, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Compressed {
        attempts: u32,
        met_target: bool,
        final_quality: u8,
        format: OutputFormat,
    },
    /// Dry run: the file would have been compressed
    Planned { format: OutputFormat },
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub original_size: u64,
    /// Equal to `original_size` for skipped and failed files
    pub new_size: u64,
    /// Zero when the header could not be read
    pub dimensions: Dimensions,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files whose size could not be read; not part of `reports`
    pub unreadable: usize,
    pub target_unmet: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    fn record(&mut self, report: FileReport) {
        match &report.outcome {
            FileOutcome::Compressed { met_target, .. } => {
                self.processed += 1;
                if !met_target {
                    self.target_unmet += 1;
                }
            }
            FileOutcome::Planned { .. } => self.processed += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
        self.reports.push(report);
    }

    /// Folds one `process_file` result in; an error only bumps `unreadable`
    fn absorb(&mut self, result: Result<FileReport>) {
        match result {
            Ok(report) => self.record(report),
            Err(_) => self.unreadable += 1,
        }
    }

    pub fn total_before(&self) -> u64 {
        self.reports.iter().map(|r| r.original_size).sum()
    }

    pub fn total_after(&self) -> u64 {
        self.reports.iter().map(|r| r.new_size).sum()
    }

    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_before(), self.total_after())
    }
}

/// Lists candidate images under `dir`, sorted by path.
///
/// Hidden entries are skipped; only extensions on the source allow-list are
/// returned.
pub fn collect_image_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ShrinkError::FileNotFound(dir.to_path_buf()));
    }

    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut image_files = Vec::new();
    for entry in walker
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && is_supported_source(path) {
            image_files.push(path.to_path_buf());
        }
    }

    Ok(image_files)
}

/// Same path when the format is unchanged, otherwise the extension is swapped
pub fn output_path_for(source: &Path, format: OutputFormat) -> PathBuf {
    if OutputFormat::from_path(source) == Some(format) {
        source.to_path_buf()
    } else {
        source.with_extension(format.extension())
    }
}

/// Writes `bytes` to `output` and removes `source` when the paths differ.
///
/// The data goes to a temp file in the target directory, is synced, and is
/// then renamed over `output`. The source is only removed after the rename.
pub fn persist_output(source: &Path, output: &Path, bytes: &[u8]) -> Result<()> {
    let converting = source != output;
    if converting && output.exists() {
        return Err(ShrinkError::OutputExists(output.to_path_buf()));
    }

    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(source) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }
    temp.persist(output).map_err(|e| ShrinkError::Io(e.error))?;

    if converting {
        fs::remove_file(source)?;
    }
    Ok(())
}

/// Handles one file end to end.
///
/// Only an unreadable file size is returned as an error; every other
/// failure is folded into a `FileOutcome::Failed` report.
pub fn process_file<C: Codec>(
    codec: &C,
    config: &ShrinkConfig,
    path: &Path,
) -> Result<FileReport> {
    let original_size = fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| ShrinkError::FileSizeRead {
            path: path.to_path_buf(),
            source,
        })?;

    let dimensions = match codec.read_dimensions(path) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            warn!("{}", e);
            Dimensions::default()
        }
    };

    let mut report = FileReport {
        path: path.to_path_buf(),
        output_path: None,
        original_size,
        new_size: original_size,
        dimensions,
        outcome: FileOutcome::Skipped,
    };

    if config.should_skip(path, original_size) {
        return Ok(report);
    }

    let request = config.request_for(path, original_size);
    let output_path = output_path_for(path, request.target_format);

    if config.dry_run {
        report.output_path = Some(output_path);
        report.outcome = FileOutcome::Planned {
            format: request.target_format,
        };
        return Ok(report);
    }

    let outcome = compress_to_target(codec, &request).and_then(|result| {
        persist_output(path, &output_path, &result.bytes)?;
        Ok(result)
    });

    match outcome {
        Ok(result) => {
            report.output_path = Some(output_path);
            report.new_size = result.size;
            report.outcome = FileOutcome::Compressed {
                attempts: result.attempts,
                met_target: result.met_target,
                final_quality: result.final_quality,
                format: result.format,
            };
        }
        Err(e) => report.outcome = FileOutcome::Failed(e.to_string()),
    }

    Ok(report)
}

/// Runs the whole batch sequentially with the given codec
pub fn run_batch<C: Codec>(codec: &C, config: &ShrinkConfig) -> Result<BatchSummary> {
    let start_time = Instant::now();
    let image_files = collect_image_files(&config.input_dir, config.recursive)?;
    let mut summary = BatchSummary::default();

    if image_files.is_empty() {
        warn!("No image files found in {:?}", config.input_dir);
        return Ok(summary);
    }

    info!(
        "📊 Found {} image files, target {} each",
        image_files.len(),
        format_file_size(config.target_size)
    );

    let progress = if crate::logger::is_quiet() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(image_files.len() as u64)
    };
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        progress.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
    }

    for path in &image_files {
        progress.set_message(display_name(path));

        let result = process_file(codec, config, path);
        progress.suspend(|| match &result {
            Ok(report) => log_report(report, config.target_size),
            Err(e) => warn!("Skipping unreadable file: {}", e),
        });
        summary.absorb(result);
        progress.inc(1);
    }

    progress.finish_and_clear();
    summary.elapsed = start_time.elapsed();
    Ok(summary)
}

/// Runs the batch with the `image`/`oxipng` codec
pub fn batch_compress_images(config: &ShrinkConfig) -> Result<BatchSummary> {
    info!("🚀 Shrinking images in {:?}", config.input_dir);
    if config.dry_run {
        info!("📝 Dry run: nothing will be written");
    }
    run_batch(&ImageCodec::new(), config)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_report(report: &FileReport, target_size: u64) {
    let name = display_name(&report.path);
    match &report.outcome {
        FileOutcome::Compressed {
            attempts,
            met_target,
            final_quality,
            format,
        } => {
            let renamed = report
                .output_path
                .as_deref()
                .filter(|p| *p != report.path)
                .map(|p| format!(" -> {}", display_name(p)))
                .unwrap_or_default();
            info!(
                "{} {}{}: {} -> {} ({:.1}%, {} q{}, {} attempt{})",
                SUCCESS_PREFIX,
                name,
                renamed,
                format_file_size(report.original_size),
                format_file_size(report.new_size),
                calculate_compression_ratio(report.original_size, report.new_size),
                format,
                final_quality,
                attempts,
                if *attempts == 1 { "" } else { "s" }
            );
            if !met_target {
                warn!(
                    "{} is still {} over the {} target after {} attempts",
                    name,
                    format_file_size(report.new_size.saturating_sub(target_size)),
                    format_file_size(target_size),
                    attempts
                );
            }
        }
        FileOutcome::Planned { format } => {
            info!(
                "📝 {}: {} ({}) would be shrunk as {}",
                name,
                format_file_size(report.original_size),
                report.dimensions,
                format
            );
        }
        FileOutcome::Skipped => {
            info!(
                "{} {}: {} already under target",
                SKIP_PREFIX,
                name,
                format_file_size(report.original_size)
            );
        }
        FileOutcome::Failed(reason) => {
            error!("Failed to shrink {:?}: {}", report.path, reason);
        }
    }
}
