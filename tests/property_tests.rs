use image::DynamicImage;
use img_shrink::{
    compress_to_target, estimate_quality, Codec, CompressionRequest, Dimensions, EncodeParameter,
    EncodeSettings, OutputFormat, ResizeSpec, Result,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Encoded length is linear in the parameter; remembers every call
struct LinearCodec {
    bytes_per_unit: usize,
    calls: RefCell<Vec<EncodeSettings>>,
}

impl Codec for LinearCodec {
    fn read_dimensions(&self, _path: &Path) -> Result<Dimensions> {
        Ok(Dimensions::new(8, 8))
    }

    fn decode(&self, _path: &Path) -> Result<DynamicImage> {
        Ok(DynamicImage::new_rgb8(8, 8))
    }

    fn encode(&self, _source: &DynamicImage, settings: &EncodeSettings) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(*settings);
        let units = match settings.parameter {
            EncodeParameter::Quality(q) => q as usize,
            EncodeParameter::Level(level) => 100 - 10 * level as usize,
        };
        Ok(vec![0u8; units * self.bytes_per_unit])
    }
}

fn quality_of(parameter: EncodeParameter) -> u8 {
    match parameter {
        EncodeParameter::Quality(q) => q,
        other => panic!("unexpected parameter {:?}", other),
    }
}

proptest! {
    #[test]
    fn seed_is_always_in_range(ratio in 0.0f64..100.0) {
        let quality = estimate_quality(ratio);
        prop_assert!((10..=95).contains(&quality));
    }

    #[test]
    fn high_ratio_seed_is_at_least_85(ratio in 0.8f64..50.0) {
        let quality = estimate_quality(ratio);
        prop_assert!((85..=95).contains(&quality));
    }

    #[test]
    fn low_ratio_seed_stays_above_floor(ratio in 0.0f64..0.3) {
        prop_assert!(estimate_quality(ratio) >= 10);
    }

    #[test]
    fn seed_is_monotonic(a in 0.0f64..2.0, b in 0.0f64..2.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(estimate_quality(low) <= estimate_quality(high));
    }

    #[test]
    fn contain_never_exceeds_bounds_or_enlarges(
        width in 1u32..5000,
        height in 1u32..5000,
        max_dimension in 1u32..3000
    ) {
        let spec = ResizeSpec::plan(None, None, max_dimension);
        let out = spec.target_dimensions(Dimensions::new(width, height));

        prop_assert!(out.width <= width.max(1) && out.height <= height.max(1));
        prop_assert!(out.width <= max_dimension.max(1) || out.width == 1);
        prop_assert!(out.height <= max_dimension.max(1) || out.height == 1);
        prop_assert!(out.width >= 1 && out.height >= 1);
    }

    #[test]
    fn width_only_matches_requested_width_when_shrinking(
        width in 100u32..4000,
        height in 100u32..4000,
        requested in 10u32..100
    ) {
        let spec = ResizeSpec::plan(Some(requested), None, 1920);
        let out = spec.target_dimensions(Dimensions::new(width, height));
        prop_assert_eq!(out.width, requested);
    }

    #[test]
    fn exact_fill_always_hits_requested_box(
        width in 1u32..4000,
        height in 1u32..4000,
        w in 1u32..4000,
        h in 1u32..4000
    ) {
        let spec = ResizeSpec::plan(Some(w), Some(h), 1920);
        prop_assert_eq!(spec.target_dimensions(Dimensions::new(width, height)), Dimensions::new(w, h));
    }

    #[test]
    fn search_quality_only_decreases_within_bounds(
        original in 1u64..10_000_000,
        target in 1u64..10_000_000,
        bytes_per_unit in 1usize..2000
    ) {
        let codec = LinearCodec { bytes_per_unit, calls: RefCell::new(Vec::new()) };
        let request = CompressionRequest {
            source_path: PathBuf::from("any.jpg"),
            original_size: original,
            target_size: target,
            requested_width: None,
            requested_height: None,
            max_dimension: 1920,
            target_format: OutputFormat::Jpeg,
        };

        let result = compress_to_target(&codec, &request).unwrap();
        let calls = codec.calls.borrow();
        let qualities: Vec<u8> = calls.iter().map(|s| quality_of(s.parameter)).collect();

        prop_assert!(calls.len() <= 6);
        prop_assert_eq!(result.attempts as usize, calls.len());
        prop_assert_eq!(qualities[0], result.initial_quality);
        prop_assert!(qualities.windows(2).all(|w| w[1] < w[0]));
        prop_assert!(qualities.iter().all(|q| (10..=95).contains(q)));
        prop_assert!(calls.iter().all(|s| s.resize == calls[0].resize));
        prop_assert_eq!(result.met_target, result.size <= target);
        if qualities[0] as usize * bytes_per_unit <= target as usize {
            prop_assert_eq!(result.attempts, 1);
        }
    }
}
