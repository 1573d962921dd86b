// THEORY:
// The `live_feed` module is the asynchronous front door of the engine. A
// single actor task owns the `CameraPipeline`; everything else talks to it
// through channels. This gives the system its concurrency discipline for
// free: the processing context is the only writer, the presentation context
// only ever reads published values, and no lock guards any extraction state.
//
// Key architectural principles:
// 1.  **Coalescing throttle**: Cameras deliver frames faster than palettes
//     are worth recomputing. Incoming frames land in a one-deep pending slot
//     (newest wins) and a tick interval drains it at most once per throttle
//     window. Backlog cannot grow: at any instant the actor holds at most
//     one undecoded frame.
// 2.  **Publish, don't share**: Palette and sample-location updates go out
//     through `watch` channels, a single-value publish-on-change. Readers
//     see the latest state without ever touching the pipeline.
// 3.  **Commands with replies**: Freeze requests carry a `oneshot` sender
//     so the caller gets the captured record back from the actor that owns
//     the state.
// 4.  **Clean teardown**: Dropping the handle sends a best-effort shutdown;
//     `shutdown()` does the same and waits for the task to finish.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::core_modules::color_sample::ExtractedColor;
use crate::core_modules::frame_sampler::VideoFrame;
use crate::core_modules::palette_builder::ColorInfo;
use crate::core_modules::records::Freeze;
use crate::pipeline::{CameraPipeline, FrameReport, PipelineConfig};

/// Message type for the feed actor.
enum FeedMessage {
    Frame(VideoFrame),
    Freeze(oneshot::Sender<Option<Freeze>>),
    Unfreeze,
    Shutdown,
}

/// Handle to a running live feed actor.
pub struct LiveFeed {
    sender: mpsc::UnboundedSender<FeedMessage>,
    palette_rx: watch::Receiver<Vec<ColorInfo>>,
    extracted_rx: watch::Receiver<Vec<ExtractedColor>>,
    task: Option<JoinHandle<()>>,
}

impl LiveFeed {
    /// Spawns the actor task that owns the pipeline.
    pub fn spawn(config: PipelineConfig) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<FeedMessage>();
        let (palette_tx, palette_rx) = watch::channel(Vec::new());
        let (extracted_tx, extracted_rx) = watch::channel(Vec::new());
        let throttle_interval = config.throttle_interval;

        let task = tokio::spawn(async move {
            let mut pipeline = CameraPipeline::new(config);
            let mut pending: Option<VideoFrame> = None;
            let mut throttle = time::interval(throttle_interval);
            throttle.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    message = receiver.recv() => {
                        match message {
                            // Newest frame wins; a pending one is dropped.
                            Some(FeedMessage::Frame(frame)) => pending = Some(frame),
                            Some(FeedMessage::Freeze(reply)) => {
                                let _ = reply.send(pipeline.freeze());
                            }
                            Some(FeedMessage::Unfreeze) => pipeline.unfreeze(),
                            Some(FeedMessage::Shutdown) | None => break,
                        }
                    }
                    _ = throttle.tick(), if pending.is_some() => {
                        if let Some(frame) = pending.take()
                            && pipeline.process_frame(frame) == FrameReport::PaletteUpdated
                        {
                            let _ = palette_tx.send(pipeline.current_palette().to_vec());
                            let _ = extracted_tx.send(pipeline.extracted_colors().to_vec());
                        }
                    }
                }
            }
        });

        Self {
            sender,
            palette_rx,
            extracted_rx,
            task: Some(task),
        }
    }

    /// Queues a frame for the next processing pass. Never blocks; frames
    /// arriving faster than the throttle window replace each other.
    pub fn submit_frame(&self, frame: VideoFrame) {
        let _ = self.sender.send(FeedMessage::Frame(frame));
    }

    /// Single-value palette channel holding the latest non-empty palette.
    pub fn palette_watch(&self) -> watch::Receiver<Vec<ColorInfo>> {
        self.palette_rx.clone()
    }

    /// Single-value channel holding the latest sample locations.
    pub fn extracted_watch(&self) -> watch::Receiver<Vec<ExtractedColor>> {
        self.extracted_rx.clone()
    }

    /// Freezes the current moment. `None` when no readable frame has been
    /// processed yet, when a freeze is already held, or when the actor is
    /// gone. Live updates stay suspended until `unfreeze`.
    pub async fn freeze(&self) -> Option<Freeze> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender.send(FeedMessage::Freeze(reply_tx)).ok()?;
        reply_rx.await.ok().flatten()
    }

    /// Resumes live palette updates.
    pub fn unfreeze(&self) {
        let _ = self.sender.send(FeedMessage::Unfreeze);
    }

    /// Stops the actor and waits for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.sender.send(FeedMessage::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        let _ = self.sender.send(FeedMessage::Shutdown);
    }
}
