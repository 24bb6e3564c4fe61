use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Stretch to exactly the requested box
    ExactFill,
    /// Scale to fit inside the bounds, keeping aspect ratio
    ContainNoEnlarge,
}

/// Resize policy for one file.
///
/// Computed once from the request and applied unchanged on every encode
/// attempt for that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitMode,
    pub allow_enlargement: bool,
}

impl ResizeSpec {
    /// Pass-through spec: output keeps the source dimensions
    pub fn none() -> Self {
        Self {
            width: None,
            height: None,
            fit: FitMode::ContainNoEnlarge,
            allow_enlargement: false,
        }
    }

    /// Derive the resize spec from the requested geometry.
    ///
    /// `max_dimension` only applies when neither width nor height is given.
    /// A requested dimension of 0 counts as absent.
    pub fn plan(width: Option<u32>, height: Option<u32>, max_dimension: u32) -> Self {
        let width = width.filter(|&w| w > 0);
        let height = height.filter(|&h| h > 0);

        match (width, height) {
            (Some(w), Some(h)) => Self {
                width: Some(w),
                height: Some(h),
                fit: FitMode::ExactFill,
                allow_enlargement: true,
            },
            (Some(_), None) | (None, Some(_)) => Self {
                width,
                height,
                fit: FitMode::ContainNoEnlarge,
                allow_enlargement: false,
            },
            (None, None) if max_dimension > 0 => Self {
                width: Some(max_dimension),
                height: Some(max_dimension),
                fit: FitMode::ContainNoEnlarge,
                allow_enlargement: false,
            },
            (None, None) => Self::none(),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Output dimensions for a source of the given size
    pub fn target_dimensions(&self, source: Dimensions) -> Dimensions {
        if self.is_passthrough() || source.width == 0 || source.height == 0 {
            return source;
        }

        match self.fit {
            FitMode::ExactFill => Dimensions::new(
                self.width.unwrap_or(source.width),
                self.height.unwrap_or(source.height),
            ),
            FitMode::ContainNoEnlarge => {
                let scale_w = self
                    .width
                    .map(|w| w as f64 / source.width as f64)
                    .unwrap_or(f64::INFINITY);
                let scale_h = self
                    .height
                    .map(|h| h as f64 / source.height as f64)
                    .unwrap_or(f64::INFINITY);

                let mut scale = scale_w.min(scale_h);
                if !self.allow_enlargement {
                    scale = scale.min(1.0);
                }
                if scale == 1.0 {
                    return source;
                }

                Dimensions::new(
                    scaled(source.width, scale),
                    scaled(source.height, scale),
                )
            }
        }
    }
}

fn scaled(length: u32, scale: f64) -> u32 {
    ((length as f64 * scale).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_only_preserves_aspect() {
        let spec = ResizeSpec::plan(Some(800), None, 1920);
        assert_eq!(spec.fit, FitMode::ContainNoEnlarge);
        assert!(!spec.allow_enlargement);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(1600, 1200)),
            Dimensions::new(800, 600)
        );
    }

    #[test]
    fn test_height_only_preserves_aspect() {
        let spec = ResizeSpec::plan(None, Some(600), 1920);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(1600, 1200)),
            Dimensions::new(800, 600)
        );
    }

    #[test]
    fn test_both_dimensions_exact_fill() {
        let spec = ResizeSpec::plan(Some(800), Some(800), 1920);
        assert_eq!(spec.fit, FitMode::ExactFill);
        assert!(spec.allow_enlargement);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(1600, 1200)),
            Dimensions::new(800, 800)
        );
    }

    #[test]
    fn test_exact_fill_enlarges() {
        let spec = ResizeSpec::plan(Some(400), Some(300), 0);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(100, 100)),
            Dimensions::new(400, 300)
        );
    }

    #[test]
    fn test_width_only_never_enlarges() {
        let spec = ResizeSpec::plan(Some(3000), None, 1920);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(1600, 1200)),
            Dimensions::new(1600, 1200)
        );
    }

    #[test]
    fn test_max_dimension_box() {
        let spec = ResizeSpec::plan(None, None, 1920);
        assert_eq!(spec.width, Some(1920));
        assert_eq!(spec.height, Some(1920));
        assert_eq!(
            spec.target_dimensions(Dimensions::new(4000, 3000)),
            Dimensions::new(1920, 1440)
        );
        assert_eq!(
            spec.target_dimensions(Dimensions::new(1000, 3000)),
            Dimensions::new(640, 1920)
        );
        assert_eq!(
            spec.target_dimensions(Dimensions::new(800, 600)),
            Dimensions::new(800, 600)
        );
    }

    #[test]
    fn test_max_dimension_ignored_when_width_given() {
        let spec = ResizeSpec::plan(Some(3000), None, 1000);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(4000, 2000)),
            Dimensions::new(3000, 1500)
        );
    }

    #[test]
    fn test_no_resize_without_max_dimension() {
        let spec = ResizeSpec::plan(None, None, 0);
        assert!(spec.is_passthrough());
        assert_eq!(
            spec.target_dimensions(Dimensions::new(5000, 10)),
            Dimensions::new(5000, 10)
        );
    }

    #[test]
    fn test_zero_request_counts_as_absent() {
        assert_eq!(
            ResizeSpec::plan(Some(0), Some(0), 0),
            ResizeSpec::none()
        );
        assert_eq!(
            ResizeSpec::plan(Some(0), Some(500), 0).fit,
            FitMode::ContainNoEnlarge
        );
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        let spec = ResizeSpec::plan(Some(10), None, 0);
        assert_eq!(
            spec.target_dimensions(Dimensions::new(10_000, 10)),
            Dimensions::new(10, 1)
        );
    }
}
