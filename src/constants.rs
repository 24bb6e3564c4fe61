pub const DEFAULT_TARGET_SIZE: u64 = 100 * 1024;
pub const DEFAULT_TARGET_SIZE_ARG: &str = "100KB";
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;
/// Largest width or height accepted from `w=`/`h=`
pub const MAX_REQUESTED_DIMENSION: u32 = 16_384;

// Quality search bounds
pub const MIN_QUALITY: u8 = 10;
pub const MAX_QUALITY: u8 = 95;
pub const QUALITY_STEP: u8 = 10;
pub const MAX_REFINEMENTS: u32 = 5;

// Size ratio segments for the quality seed
pub const HIGH_RATIO_FLOOR: f64 = 0.8;
pub const MID_RATIO_FLOOR: f64 = 0.5;
pub const LOW_RATIO_FLOOR: f64 = 0.3;

pub const PNG_MAX_OXIPNG_PRESET: u8 = 6;
pub const AVIF_ENCODER_SPEED: u8 = 8;

pub const SUPPORTED_SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tiff", "tif", "bmp"];
pub const EXCLUDED_SOURCE_EXTENSIONS: &[&str] = &["gif", "svg", "avif", "heic", "heif"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_BAR_CHARS: &str = "#>-";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const SKIP_PREFIX: &str = "⏭️ ";
