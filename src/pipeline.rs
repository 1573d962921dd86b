// THEORY:
// The `pipeline` module is the top-level synchronous API for the palette
// engine. `CameraPipeline` is the single controller that owns all mutable
// state the presentation layer observes: the current palette, the current
// sample locations, and the last readable frame. Keeping that state behind
// one object (instead of ambient globals) is what makes the engine testable
// without any UI framework attached.
//
// The per-frame contract follows the feed's reality: frames go missing.
// An unreadable frame reports `FrameUnreadable` and leaves every piece of
// state untouched, so a transient glitch never blanks the user's palette.

use std::time::Duration;

use crate::core_modules::frame_sampler::FrameSampler;
use crate::core_modules::palette_builder::PaletteBuilder;

// Re-export key data structures for the public API.
pub use crate::core_modules::color_namer::{ColorNamer, NAMED_COLORS, NamedColor};
pub use crate::core_modules::color_sample::{ColorSample, ExtractedColor, NormalizedPoint};
pub use crate::core_modules::frame_sampler::{
    DEFAULT_CORNER_MARGIN, DEFAULT_DOWNSCALE_FACTOR, VideoFrame,
};
pub use crate::core_modules::palette_builder::{ColorInfo, DEFAULT_JPEG_QUALITY};
pub use crate::core_modules::records::{CaptureScene, Freeze};

/// Configuration for the palette pipeline, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fraction of each linear dimension kept when downscaling frames.
    pub downscale_factor: f64,
    /// Inset of the corner sample points, in downscaled pixels.
    pub corner_margin: u32,
    /// JPEG quality for frozen stills (1-100).
    pub jpeg_quality: u8,
    /// Minimum interval between two processing passes in live mode.
    pub throttle_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            downscale_factor: DEFAULT_DOWNSCALE_FACTOR,
            corner_margin: DEFAULT_CORNER_MARGIN,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            throttle_interval: Duration::from_millis(100),
        }
    }
}

/// Whether the pipeline is feeding live updates or holding a frozen moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Live,
    Frozen,
}

/// The outcome of one processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReport {
    /// The frame was readable; palette, locations, and held frame replaced.
    PaletteUpdated,
    /// The frame was unreadable; all previous state retained.
    FrameUnreadable,
    /// A freeze is being held; live frames are ignored until `unfreeze`.
    Frozen,
}

/// The main, top-level controller for the palette engine.
pub struct CameraPipeline {
    builder: PaletteBuilder,
    mode: PipelineMode,
    current_palette: Vec<ColorInfo>,
    extracted_colors: Vec<ExtractedColor>,
    last_frame: Option<VideoFrame>,
}

impl CameraPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let sampler = FrameSampler::new(config.downscale_factor, config.corner_margin);
        Self {
            builder: PaletteBuilder::new(sampler, config.jpeg_quality),
            mode: PipelineMode::Live,
            current_palette: Vec::new(),
            extracted_colors: Vec::new(),
            last_frame: None,
        }
    }

    /// Runs one extraction pass. State changes only on a readable frame.
    pub fn process_frame(&mut self, frame: VideoFrame) -> FrameReport {
        if self.mode == PipelineMode::Frozen {
            return FrameReport::Frozen;
        }

        let extracted = self.builder.extract(&frame);
        if extracted.is_empty() {
            return FrameReport::FrameUnreadable;
        }

        self.current_palette = self.builder.palette_from(&extracted);
        self.extracted_colors = extracted;
        self.last_frame = Some(frame);
        FrameReport::PaletteUpdated
    }

    /// The latest non-empty palette, in sampling order.
    pub fn current_palette(&self) -> &[ColorInfo] {
        &self.current_palette
    }

    /// The latest sample locations, for overlay rendering.
    pub fn extracted_colors(&self) -> &[ExtractedColor] {
        &self.extracted_colors
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    /// Captures the held frame and palette into a `Freeze` and suspends live
    /// processing. `None` when no readable frame has been processed yet, or
    /// when a freeze is already being held.
    pub fn freeze(&mut self) -> Option<Freeze> {
        if self.mode == PipelineMode::Frozen {
            return None;
        }
        let frame = self.last_frame.as_ref()?;
        let freeze = self.builder.capture_freeze(frame, &self.current_palette);
        self.mode = PipelineMode::Frozen;
        log::info!(
            "froze moment {} with {} color(s)",
            freeze.id,
            freeze.palette.len()
        );
        Some(freeze)
    }

    /// Returns to live mode and drops the held frame reference.
    pub fn unfreeze(&mut self) {
        self.last_frame = None;
        self.mode = PipelineMode::Live;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn uniform_frame(r: u8, g: u8, b: u8) -> VideoFrame {
        let (width, height) = (160u32, 120u32);
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        VideoFrame::new(data, width, height)
    }

    fn unreadable_frame() -> VideoFrame {
        VideoFrame::new(vec![9u8; 7], 160, 120)
    }

    #[test]
    fn readable_frames_replace_the_palette() {
        let mut pipeline = CameraPipeline::new(PipelineConfig::default());
        assert_eq!(
            pipeline.process_frame(uniform_frame(255, 0, 0)),
            FrameReport::PaletteUpdated
        );
        assert_eq!(pipeline.current_palette().len(), 5);
        assert_eq!(pipeline.current_palette()[0].name, "Red");

        assert_eq!(
            pipeline.process_frame(uniform_frame(0, 0, 255)),
            FrameReport::PaletteUpdated
        );
        assert_eq!(pipeline.current_palette()[0].name, "Blue");
    }

    #[test]
    fn unreadable_frames_retain_the_previous_palette() {
        let mut pipeline = CameraPipeline::new(PipelineConfig::default());
        pipeline.process_frame(uniform_frame(255, 0, 0));
        let before: Vec<ColorInfo> = pipeline.current_palette().to_vec();

        assert_eq!(
            pipeline.process_frame(unreadable_frame()),
            FrameReport::FrameUnreadable
        );
        assert_eq!(pipeline.current_palette(), &before[..]);
        assert_eq!(pipeline.extracted_colors().len(), 5);
    }

    #[test]
    fn freeze_requires_a_processed_frame() {
        let mut pipeline = CameraPipeline::new(PipelineConfig::default());
        assert!(pipeline.freeze().is_none());
        assert_eq!(pipeline.mode(), PipelineMode::Live);
    }

    #[test]
    fn freeze_snapshots_and_suspends_live_updates() {
        let mut pipeline = CameraPipeline::new(PipelineConfig::default());
        pipeline.process_frame(uniform_frame(255, 0, 0));

        let started = Utc::now();
        let freeze = pipeline.freeze().expect("a frame was processed");
        assert_eq!(freeze.palette, pipeline.current_palette());
        assert!(freeze.created_at >= started);
        assert_eq!(pipeline.mode(), PipelineMode::Frozen);

        // Frozen mode ignores new frames and refuses a second freeze.
        assert_eq!(
            pipeline.process_frame(uniform_frame(0, 255, 0)),
            FrameReport::Frozen
        );
        assert_eq!(pipeline.current_palette()[0].name, "Red");
        assert!(pipeline.freeze().is_none());

        // The freeze keeps its palette even after live updates resume.
        pipeline.unfreeze();
        pipeline.process_frame(uniform_frame(0, 255, 0));
        assert_eq!(freeze.palette[0].name, "Red");
        assert_eq!(pipeline.current_palette()[0].name, "Lime");
    }

    #[test]
    fn unfreeze_drops_the_held_frame() {
        let mut pipeline = CameraPipeline::new(PipelineConfig::default());
        pipeline.process_frame(uniform_frame(255, 0, 0));
        assert!(pipeline.freeze().is_some());

        pipeline.unfreeze();
        // No frame is held until the next readable one arrives.
        assert!(pipeline.freeze().is_none());
        pipeline.process_frame(uniform_frame(255, 0, 0));
        assert!(pipeline.freeze().is_some());
    }
}
