// THEORY:
// This file is the main entry point for the `scene_color` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like a camera front-end or
// the bundled demo runner).
//
// The primary goal is to export the `CameraPipeline` / `LiveFeed` pair and
// their associated data structures (`PipelineConfig`, `ColorInfo`, `Freeze`,
// etc.) as the clean, high-level interface for the entire palette engine. The
// lower-level building blocks live in `core_modules` and are re-exported
// through `pipeline` where consumers need them.

pub mod core_modules;
pub mod live_feed;
pub mod pipeline;
pub mod scene_store;
