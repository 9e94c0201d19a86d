/// Animation time added on every frame.
///
/// The clock is frame-counted, not wall-clock: a faster display animates
/// the lights faster.
pub const TIME_STEP: f64 = 0.01;

/// Fixed-step animation clock with an explicit start/stop handle.
///
/// While running, each [`FrameLoop::tick`] hands out the current animation
/// time and then advances to the next frame, so frame `n` animates at
/// `n × TIME_STEP`. Time is derived from the frame count rather than summed,
/// so every step stays exactly [`TIME_STEP`] however long the loop runs.
/// A stopped loop hands out nothing and keeps its time.
#[derive(Clone, Debug, Default)]
pub struct FrameLoop {
    frames: u64,
    running: bool,
}

impl FrameLoop {
    /// A stopped loop at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stopped loop that has already ticked `frames` times.
    pub fn at_frame(frames: u64) -> Self {
        Self {
            frames,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Animation time the next frame will use.
    pub fn time(&self) -> f64 {
        self.frames as f64 * TIME_STEP
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Claim the time for one frame, or `None` if the loop is stopped.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }
        let now = self.time();
        self.frames += 1;
        Some(now)
    }
}
