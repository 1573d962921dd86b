// Example runner for the `scene_color` library: synthesizes a short feed of
// drifting gradient frames, streams them through a `LiveFeed`, then freezes
// the final moment into a scene.
//
// A real application would replace `synthetic_frame` with frames pulled from
// a camera capture session and hand the palette watch to its UI layer.

use std::time::Duration;

use anyhow::Result;
use scene_color::live_feed::LiveFeed;
use scene_color::pipeline::{PipelineConfig, VideoFrame};
use scene_color::scene_store::SceneStore;

const FEED_WIDTH: u32 = 320;
const FEED_HEIGHT: u32 = 240;
const FEED_FRAMES: u32 = 20;

/// A horizontal gradient that drifts with the tick, so palettes change as a
/// live camera's would.
fn synthetic_frame(tick: u32) -> VideoFrame {
    let mut data = Vec::with_capacity((FEED_WIDTH * FEED_HEIGHT * 4) as usize);
    for y in 0..FEED_HEIGHT {
        for x in 0..FEED_WIDTH {
            let red = ((x * 255 / FEED_WIDTH) + tick * 12) % 256;
            let green = (y * 255 / FEED_HEIGHT) % 256;
            data.extend_from_slice(&[red as u8, green as u8, 96, 255]);
        }
    }
    VideoFrame::new(data, FEED_WIDTH, FEED_HEIGHT)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let feed = LiveFeed::spawn(PipelineConfig::default());
    let mut palette_rx = feed.palette_watch();

    for tick in 0..FEED_FRAMES {
        feed.submit_frame(synthetic_frame(tick));
        tokio::time::sleep(Duration::from_millis(50)).await;

        if palette_rx.has_changed()? {
            let palette = palette_rx.borrow_and_update().clone();
            let summary: Vec<String> = palette
                .iter()
                .map(|info| format!("{} {}", info.hex, info.name))
                .collect();
            println!("palette: {}", summary.join(", "));
        }
    }

    let Some(freeze) = feed.freeze().await else {
        anyhow::bail!("no readable frame was processed; nothing to freeze");
    };
    println!(
        "froze moment {} with {} color(s) ({} byte still)",
        freeze.id,
        freeze.palette.len(),
        freeze.image_data.len()
    );

    let mut store = SceneStore::in_memory();
    let scene_id = store.create_scene("Demo Scene");
    store.add_freeze(scene_id, freeze)?;
    println!(
        "scene {} now holds {} freeze(s)",
        scene_id,
        store.scenes()[0].freezes.len()
    );

    feed.shutdown().await;
    Ok(())
}
