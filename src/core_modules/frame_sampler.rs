// THEORY:
// The `FrameSampler` turns one raw video frame into a small, fixed set of
// representative colors with their image-space locations. It is the front of
// the per-frame pipeline and the module that decides how much work a frame
// costs.
//
// Key architectural principles:
// 1.  **Downscale first**: The frame is shrunk toward 10% of each linear
//     dimension before any sampling happens. The scale factor is a cost
//     knob, not a correctness requirement; a live feed has to stay cheap at
//     double-digit frames per second.
// 2.  **Five fixed points**: The geometric center plus four corner-inset
//     points, always in the same order [center, top-left, top-right,
//     bottom-left, bottom-right]. A fixed sampling pattern keeps per-frame
//     cost bounded and the output shape predictable for everything
//     downstream. The strategy is swappable (a clustering pass could replace
//     it) as long as `extract` keeps returning a fixed-size ordered list
//     with normalized locations.
// 3.  **Stateless**: Each frame's extraction is independent. No history, no
//     smoothing, no locking; `extract` is a pure function of the frame.
// 4.  **Unreadable means empty**: A frame that does not decode produces an
//     empty extraction instead of an error. Frame misses are routine for a
//     live feed and the caller simply keeps its previous palette.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::core_modules::color_sample::{ColorSample, ExtractedColor, NormalizedPoint};

/// Fraction of each linear dimension kept when downscaling before sampling.
pub const DEFAULT_DOWNSCALE_FACTOR: f64 = 0.1;
/// Inset of the four corner sample points, in downscaled pixels.
pub const DEFAULT_CORNER_MARGIN: u32 = 10;

/// A raw video frame: tightly packed RGBA8 bytes plus the frame's extent.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Decodes the buffer into an image. `None` when the frame is unreadable:
    /// a zero extent, or a buffer that does not match width * height * 4.
    pub(crate) fn decode(&self) -> Option<RgbaImage> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// Extracts a fixed five-point palette from single frames.
pub struct FrameSampler {
    downscale_factor: f64,
    corner_margin: u32,
}

impl FrameSampler {
    pub fn new(downscale_factor: f64, corner_margin: u32) -> Self {
        Self {
            downscale_factor,
            corner_margin,
        }
    }

    /// The main entry point of the sampling layer. Returns exactly 5 samples
    /// in [center, top-left, top-right, bottom-left, bottom-right] order for
    /// a readable frame, or an empty vec for an unreadable one.
    pub fn extract(&self, frame: &VideoFrame) -> Vec<ExtractedColor> {
        let Some(image) = frame.decode() else {
            log::debug!(
                "skipping unreadable {}x{} frame ({} bytes)",
                frame.width,
                frame.height,
                frame.data.len()
            );
            return Vec::new();
        };

        let scaled = self.downscale(&image);
        let (width, height) = scaled.dimensions();

        self.sample_points(width, height)
            .into_iter()
            .map(|(x, y)| ExtractedColor {
                color: ColorSample::from(*scaled.get_pixel(x, y)),
                location: NormalizedPoint {
                    x: x as f64 / width as f64,
                    y: y as f64 / height as f64,
                },
            })
            .collect()
    }

    fn downscale(&self, image: &RgbaImage) -> RgbaImage {
        let width = ((image.width() as f64 * self.downscale_factor).round() as u32).max(1);
        let height = ((image.height() as f64 * self.downscale_factor).round() as u32).max(1);
        imageops::resize(image, width, height, FilterType::Lanczos3)
    }

    /// Center plus four corner points inset by the configured margin. Insets
    /// clamp into the extent so frames smaller than the margin still sample.
    fn sample_points(&self, width: u32, height: u32) -> [(u32, u32); 5] {
        let left = self.corner_margin.min(width - 1);
        let top = self.corner_margin.min(height - 1);
        let right = width.saturating_sub(self.corner_margin).min(width - 1);
        let bottom = height.saturating_sub(self.corner_margin).min(height - 1);

        [
            (width / 2, height / 2),
            (left, top),
            (right, top),
            (left, bottom),
            (right, bottom),
        ]
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNSCALE_FACTOR, DEFAULT_CORNER_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_frame(r: u8, g: u8, b: u8, width: u32, height: u32) -> VideoFrame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        VideoFrame::new(data, width, height)
    }

    #[test]
    fn readable_frame_yields_five_samples_in_fixed_order() {
        let sampler = FrameSampler::default();
        let samples = sampler.extract(&uniform_frame(255, 0, 0, 640, 480));

        assert_eq!(samples.len(), 5);
        // 640x480 downscales to 64x48; the center lands at (32, 24).
        assert_eq!(samples[0].location.x, 0.5);
        assert_eq!(samples[0].location.y, 0.5);
        // Corner order: top-left, top-right, bottom-left, bottom-right.
        assert!(samples[1].location.x < samples[2].location.x);
        assert_eq!(samples[1].location.y, samples[2].location.y);
        assert!(samples[3].location.y > samples[1].location.y);
        assert!(samples[3].location.x < samples[4].location.x);
    }

    #[test]
    fn locations_are_normalized() {
        let sampler = FrameSampler::default();
        for frame in [
            uniform_frame(12, 200, 99, 1920, 1080),
            uniform_frame(12, 200, 99, 31, 17),
            uniform_frame(12, 200, 99, 1, 1),
        ] {
            for sample in sampler.extract(&frame) {
                assert!((0.0..=1.0).contains(&sample.location.x));
                assert!((0.0..=1.0).contains(&sample.location.y));
            }
        }
    }

    #[test]
    fn uniform_frame_samples_uniformly() {
        let sampler = FrameSampler::default();
        for sample in sampler.extract(&uniform_frame(255, 0, 0, 320, 240)) {
            assert_eq!(sample.color, ColorSample::new(255, 0, 0));
        }
    }

    #[test]
    fn unreadable_frames_yield_empty_extractions() {
        let sampler = FrameSampler::default();
        // Buffer length does not match the claimed extent.
        assert!(
            sampler
                .extract(&VideoFrame::new(vec![0u8; 16], 100, 100))
                .is_empty()
        );
        // Zero extent.
        assert!(sampler.extract(&VideoFrame::new(Vec::new(), 0, 0)).is_empty());
        assert!(
            sampler
                .extract(&VideoFrame::new(vec![0u8; 400], 0, 100))
                .is_empty()
        );
    }

    #[test]
    fn tiny_frames_still_sample() {
        // 5x5 downscales to 1x1; every point clamps to the single pixel.
        let sampler = FrameSampler::default();
        let samples = sampler.extract(&uniform_frame(0, 0, 255, 5, 5));
        assert_eq!(samples.len(), 5);
        for sample in samples {
            assert_eq!(sample.color, ColorSample::new(0, 0, 255));
        }
    }
}
