//! Adaptive compression search.
//!
//! Seeds a quality from the size ratio, encodes, then lowers quality in fixed
//! steps until the output fits the budget, quality bottoms out, or the retry
//! budget runs out.
//!
//! Invariant: every attempt encodes from the pixels of the original source,
//! decoded once per file. A previous attempt's output is never fed back into
//! the encoder, so lossy formats do not accumulate generation loss.

use crate::codec::{Codec, EncodeSettings};
use crate::constants::{MAX_REFINEMENTS, MIN_QUALITY, QUALITY_STEP};
use crate::error::Result;
use crate::formats::OutputFormat;
use crate::quality::{estimate_quality, size_ratio};
use crate::resize::ResizeSpec;
use crate::verbose;
use std::path::PathBuf;

/// One file's compression job. Immutable for the duration of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub source_path: PathBuf,
    pub original_size: u64,
    pub target_size: u64,
    pub requested_width: Option<u32>,
    pub requested_height: Option<u32>,
    pub max_dimension: u32,
    pub target_format: OutputFormat,
}

impl CompressionRequest {
    pub fn resize_spec(&self) -> ResizeSpec {
        ResizeSpec::plan(self.requested_width, self.requested_height, self.max_dimension)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeAttempt {
    pub quality: u8,
    pub bytes: Vec<u8>,
}

impl EncodeAttempt {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    pub bytes: Vec<u8>,
    pub size: u64,
    /// Encode calls made, including the first
    pub attempts: u32,
    pub met_target: bool,
    pub initial_quality: u8,
    pub final_quality: u8,
    pub format: OutputFormat,
}

/// Runs the search for one file.
///
/// A codec failure at any attempt aborts the file. An output still over
/// budget after the last attempt is returned with `met_target == false`.
pub fn compress_to_target<C: Codec>(
    codec: &C,
    request: &CompressionRequest,
) -> Result<CompressionResult> {
    let resize = request.resize_spec();
    let strategy = request.target_format.strategy();
    let initial_quality = estimate_quality(size_ratio(request.target_size, request.original_size));

    let source = codec.decode(&request.source_path)?;

    let encode = |quality: u8| -> Result<EncodeAttempt> {
        let settings = EncodeSettings {
            resize,
            format: request.target_format,
            parameter: strategy.parameter(quality),
        };
        let bytes = codec.encode(&source, &settings)?;
        Ok(EncodeAttempt { quality, bytes })
    };

    let mut attempt = encode(initial_quality)?;
    let mut refinements = 0;
    verbose!(
        "{:?}: attempt 1 at quality {} -> {} bytes (target {})",
        request.source_path,
        attempt.quality,
        attempt.size(),
        request.target_size
    );

    while attempt.size() > request.target_size
        && attempt.quality > MIN_QUALITY
        && refinements < MAX_REFINEMENTS
    {
        let quality = attempt.quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
        attempt = encode(quality)?;
        refinements += 1;
        verbose!(
            "{:?}: attempt {} at quality {} -> {} bytes",
            request.source_path,
            refinements + 1,
            attempt.quality,
            attempt.size()
        );
    }

    let size = attempt.size();
    Ok(CompressionResult {
        size,
        met_target: size <= request.target_size,
        attempts: refinements + 1,
        initial_quality,
        final_quality: attempt.quality,
        format: request.target_format,
        bytes: attempt.bytes,
    })
}
