// THEORY:
// The `PaletteBuilder` is the orchestrator of the per-frame pipeline. It wires
// the sampler's raw output through the namer and shapes the result into the
// records the rest of the system consumes: `ColorInfo` entries for display,
// and `Freeze` records when the user captures a moment.
//
// Key architectural principles:
// 1.  **Order preservation**: One `ColorInfo` per extracted color, in the
//     sampler's order. An empty extraction produces an empty palette; the
//     caller decides whether to keep showing its previous one.
// 2.  **Display-ready output**: Hex string and name are computed here, once,
//     so the presentation layer never touches raw samples.
// 3.  **Freeze tolerance**: Capturing a moment must not take the feed down.
//     A frame that fails to encode yields a freeze with an empty still and a
//     logged warning, never an error.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::core_modules::color_namer::ColorNamer;
use crate::core_modules::color_sample::{ColorSample, ExtractedColor};
use crate::core_modules::frame_sampler::{FrameSampler, VideoFrame};
use crate::core_modules::ids;
use crate::core_modules::records::Freeze;

/// JPEG quality used for frozen stills (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// A display-ready palette entry: hex string, human-readable name, and the
/// raw channels they were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    /// Fresh per instance; list views use it to diff palette updates.
    pub id: u64,
    pub hex: String,
    pub name: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorInfo {
    pub fn from_sample(sample: ColorSample, namer: &ColorNamer) -> Self {
        Self {
            id: ids::next_id(),
            hex: sample.hex(),
            name: namer.name(sample).to_string(),
            r: sample.r,
            g: sample.g,
            b: sample.b,
        }
    }

    pub fn sample(&self) -> ColorSample {
        ColorSample::new(self.r, self.g, self.b)
    }
}

/// Turns raw frames into display-ready palettes and freeze records.
pub struct PaletteBuilder {
    sampler: FrameSampler,
    namer: ColorNamer,
    jpeg_quality: u8,
}

impl PaletteBuilder {
    pub fn new(sampler: FrameSampler, jpeg_quality: u8) -> Self {
        Self {
            sampler,
            namer: ColorNamer::new(),
            jpeg_quality,
        }
    }

    /// Raw sampler output, locations included; overlay rendering needs them.
    pub fn extract(&self, frame: &VideoFrame) -> Vec<ExtractedColor> {
        self.sampler.extract(frame)
    }

    /// One `ColorInfo` per extracted color, in extraction order. Empty for
    /// unreadable frames.
    pub fn build_palette(&self, frame: &VideoFrame) -> Vec<ColorInfo> {
        self.palette_from(&self.extract(frame))
    }

    /// Derives display entries from an extraction already in hand, so one
    /// sampling pass can feed both the palette and the overlay.
    pub fn palette_from(&self, extracted: &[ExtractedColor]) -> Vec<ColorInfo> {
        extracted
            .iter()
            .map(|entry| ColorInfo::from_sample(entry.color, &self.namer))
            .collect()
    }

    /// Snapshots a frame and the current palette into an immutable `Freeze`
    /// with a fresh id and timestamp.
    pub fn capture_freeze(&self, frame: &VideoFrame, palette: &[ColorInfo]) -> Freeze {
        Freeze::new(self.encode_jpeg(frame), palette.to_vec())
    }

    fn encode_jpeg(&self, frame: &VideoFrame) -> Vec<u8> {
        let Some(image) = frame.decode() else {
            log::warn!("freeze requested on an unreadable frame; storing an empty still");
            return Vec::new();
        };

        // JPEG carries no alpha channel.
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        let mut encoded = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut encoded, self.jpeg_quality);
        match encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        {
            Ok(()) => encoded,
            Err(error) => {
                log::warn!("failed to encode freeze still: {error}; storing an empty still");
                Vec::new()
            }
        }
    }
}

impl Default for PaletteBuilder {
    fn default() -> Self {
        Self::new(FrameSampler::default(), DEFAULT_JPEG_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn uniform_frame(r: u8, g: u8, b: u8) -> VideoFrame {
        let (width, height) = (320u32, 240u32);
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        VideoFrame::new(data, width, height)
    }

    #[test]
    fn pure_red_frame_builds_a_red_palette() {
        let builder = PaletteBuilder::default();
        let palette = builder.build_palette(&uniform_frame(255, 0, 0));

        assert_eq!(palette.len(), 5);
        for info in &palette {
            assert_eq!(info.hex, "#FF0000");
            assert_eq!(info.name, "Red");
            assert_eq!((info.r, info.g, info.b), (255, 0, 0));
        }
    }

    #[test]
    fn palette_entries_get_fresh_ids() {
        let builder = PaletteBuilder::default();
        let palette = builder.build_palette(&uniform_frame(0, 255, 255));
        let mut seen = std::collections::HashSet::new();
        for info in &palette {
            assert!(seen.insert(info.id));
            assert_eq!(info.name, "Cyan");
        }
    }

    #[test]
    fn unreadable_frame_builds_an_empty_palette() {
        let builder = PaletteBuilder::default();
        let palette = builder.build_palette(&VideoFrame::new(vec![1, 2, 3], 640, 480));
        assert!(palette.is_empty());
    }

    #[test]
    fn capture_freeze_snapshots_the_palette() {
        let builder = PaletteBuilder::default();
        let frame = uniform_frame(255, 0, 0);
        let palette = builder.build_palette(&frame);

        let started = Utc::now();
        let freeze = builder.capture_freeze(&frame, &palette);

        assert_eq!(freeze.palette, palette);
        assert!(freeze.created_at >= started);
        // JPEG streams open with the SOI marker.
        assert_eq!(&freeze.image_data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn capture_freeze_tolerates_unreadable_frames() {
        let builder = PaletteBuilder::default();
        let freeze = builder.capture_freeze(&VideoFrame::new(Vec::new(), 10, 10), &[]);
        assert!(freeze.image_data.is_empty());
        assert!(freeze.palette.is_empty());
    }
}
