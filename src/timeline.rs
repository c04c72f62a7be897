use image::RgbaImage;

use crate::error::{GifstripError, GifstripResult};

/// Display duration substituted when a container carries no per-frame timing.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// One decoded frame plus its display duration.
#[derive(Clone, Debug)]
pub struct TimedFrame {
    pub image: RgbaImage,
    pub duration_ms: u32, // must be > 0
}

/// The ordered frame sequence of a single input animation.
///
/// Non-empty by construction, with strictly positive durations, so cumulative
/// end-times are monotonically increasing.
#[derive(Clone, Debug)]
pub struct SourceTimeline {
    frames: Vec<TimedFrame>,
}

impl SourceTimeline {
    pub fn new(frames: Vec<TimedFrame>) -> GifstripResult<Self> {
        if frames.is_empty() {
            return Err(GifstripError::empty_timeline(
                "source animation decoded to zero frames",
            ));
        }
        if let Some(idx) = frames.iter().position(|f| f.duration_ms == 0) {
            return Err(GifstripError::invalid_parameter(format!(
                "frame {idx} has zero duration (durations must be positive)"
            )));
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    pub fn first_frame(&self) -> &TimedFrame {
        &self.frames[0]
    }

    /// Cumulative end-time of every frame, in source order.
    ///
    /// These are exactly the instants at which this source's displayed frame
    /// changes.
    pub fn end_times_ms(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.iter().scan(0u64, |acc, f| {
            *acc += u64::from(f.duration_ms);
            Some(*acc)
        })
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }

    /// The frame active at instant `t_ms`: the first frame whose cumulative
    /// end-time is >= `t_ms`. A frame stays active through its own end-time,
    /// so ties resolve toward the earlier frame. Past the timeline's total
    /// duration the last frame is held.
    pub fn frame_at_ms(&self, t_ms: u64) -> &TimedFrame {
        let mut elapsed = 0u64;
        for frame in &self.frames {
            elapsed += u64::from(frame.duration_ms);
            if elapsed >= t_ms {
                return frame;
            }
        }
        &self.frames[self.frames.len() - 1]
    }
}
