pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod quality;
pub mod resize;
pub mod search;
pub mod utils;

pub use batch::{
    batch_compress_images, collect_image_files, output_path_for, persist_output, process_file,
    run_batch, BatchSummary, FileOutcome, FileReport,
};
pub use codec::{Codec, EncodeSettings, ImageCodec};
pub use config::ShrinkConfig;
pub use error::{Result, ShrinkError};
pub use formats::{EncodeParameter, OutputFormat, ParameterStrategy};
pub use quality::{estimate_quality, size_ratio};
pub use resize::{Dimensions, FitMode, ResizeSpec};
pub use search::{compress_to_target, CompressionRequest, CompressionResult};
