use std::collections::BTreeSet;

use image::{RgbaImage, imageops};

use crate::{
    error::{GifstripError, GifstripResult},
    timeline::{SourceTimeline, TimedFrame},
};

/// How the uniform row height is chosen before sources are resized for
/// concatenation.
///
/// The merge algorithm itself never consults this; it only sees timelines
/// that the caller already resized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeightPolicy {
    /// Minimum height across each source's first frame. Never upscales a
    /// source past its native resolution; assumes every frame of a source
    /// shares its first frame's height.
    #[default]
    FirstFrame,
    /// Minimum height across every frame of every source.
    GlobalMin,
    /// Maximum height across every frame of every source.
    GlobalMax,
}

impl HeightPolicy {
    /// Resolve the uniform target height for a set of timelines.
    pub fn target_height(self, timelines: &[SourceTimeline]) -> GifstripResult<u32> {
        if timelines.is_empty() {
            return Err(GifstripError::invalid_parameter(
                "height policy needs at least one timeline",
            ));
        }

        let height = match self {
            HeightPolicy::FirstFrame => timelines
                .iter()
                .map(|t| t.first_frame().image.height())
                .min(),
            HeightPolicy::GlobalMin => all_heights(timelines).min(),
            HeightPolicy::GlobalMax => all_heights(timelines).max(),
        };

        match height {
            Some(h) if h > 0 => Ok(h),
            _ => Err(GifstripError::invalid_frame(
                "a source frame has zero height",
            )),
        }
    }
}

fn all_heights(timelines: &[SourceTimeline]) -> impl Iterator<Item = u32> + '_ {
    timelines
        .iter()
        .flat_map(|t| t.frames().iter().map(|f| f.image.height()))
}

/// The merged output: one composite frame per unified event instant, plus the
/// inter-instant display durations.
#[derive(Clone, Debug)]
pub struct MergedAnimation {
    pub frames: Vec<RgbaImage>,
    pub durations_ms: Vec<u32>,
    /// The unified timeline: sorted, deduplicated union of every source's
    /// frame-change instants (milliseconds from t=0).
    pub instants_ms: Vec<u64>,
}

impl MergedAnimation {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.instants_ms.last().copied().unwrap_or(0)
    }
}

/// Merge already-resized source timelines into one side-by-side animation.
///
/// The unified timeline is the union of every source's cumulative frame
/// end-times; for each instant, the frame active at that instant is selected
/// from each source (holding the last frame once a source's own timeline is
/// exhausted) and the selections are concatenated left-to-right in source
/// order onto a transparent canvas.
#[tracing::instrument(skip_all, fields(sources = timelines.len()))]
pub fn merge(timelines: &[SourceTimeline]) -> GifstripResult<MergedAnimation> {
    if timelines.is_empty() {
        return Err(GifstripError::invalid_parameter(
            "merge needs at least one source timeline",
        ));
    }

    let mut instants = BTreeSet::new();
    for timeline in timelines {
        instants.extend(timeline.end_times_ms());
    }
    tracing::debug!(events = instants.len(), "unified timeline constructed");

    let mut frames = Vec::with_capacity(instants.len());
    let mut durations_ms = Vec::with_capacity(instants.len());
    let mut prev = 0u64;
    for &t in &instants {
        let selected: Vec<&TimedFrame> = timelines.iter().map(|tl| tl.frame_at_ms(t)).collect();
        frames.push(composite_row(&selected));
        durations_ms.push(u32::try_from(t - prev).unwrap_or(u32::MAX));
        prev = t;
    }

    Ok(MergedAnimation {
        frames,
        durations_ms,
        instants_ms: instants.into_iter().collect(),
    })
}

/// Paste the selected frames at successive x-offsets onto one transparent
/// canvas. After resizing all heights match; any residual difference shows up
/// as transparent padding rather than stale pixels.
fn composite_row(selected: &[&TimedFrame]) -> RgbaImage {
    let total_width: u32 = selected.iter().map(|f| f.image.width()).sum();
    let height = selected
        .iter()
        .map(|f| f.image.height())
        .max()
        .unwrap_or(0);

    let mut canvas = RgbaImage::new(total_width, height);
    let mut x = 0i64;
    for frame in selected {
        imageops::replace(&mut canvas, &frame.image, x, 0);
        x += i64::from(frame.image.width());
    }
    canvas
}
