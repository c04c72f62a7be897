use std::path::Path;

use serde::Serialize;

use crate::{error::GifstripResult, extract, timeline::SourceTimeline};

/// Inspection summary for one input animation.
#[derive(Clone, Debug, Serialize)]
pub struct SourceReport {
    pub path: String,
    pub frame_count: usize,
    /// First-frame dimensions; the uniform-height policies key off these.
    pub width: u32,
    pub height: u32,
    pub total_duration_ms: u64,
    pub durations_ms: Vec<u32>,
}

pub fn report_for(path: &Path, timeline: &SourceTimeline) -> SourceReport {
    let (width, height) = timeline.first_frame().image.dimensions();
    SourceReport {
        path: path.display().to_string(),
        frame_count: timeline.len(),
        width,
        height,
        total_duration_ms: timeline.total_duration_ms(),
        durations_ms: timeline.frames().iter().map(|f| f.duration_ms).collect(),
    }
}

/// Decode an animation and summarize its timeline.
pub fn probe_path(path: &Path) -> GifstripResult<SourceReport> {
    let timeline = extract::extract_path(path)?;
    Ok(report_for(path, &timeline))
}
