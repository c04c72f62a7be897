use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    encode::{EncodeConfig, write_animation},
    error::{GifstripError, GifstripResult},
    extract::extract_path,
    merge::{HeightPolicy, merge},
    resize::resize_timeline,
    timeline::SourceTimeline,
};

/// Threading and sizing controls for the merge pipeline.
#[derive(Clone, Debug)]
pub struct MergeOptions {
    /// How the uniform row height is chosen before resizing.
    pub height_policy: HeightPolicy,
    /// Extract and resize sources on a worker pool when `true`. The merge
    /// and write stages always run single-threaded.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            height_policy: HeightPolicy::FirstFrame,
            parallel: false,
            threads: None,
        }
    }
}

/// Aggregated pipeline counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of input animations.
    pub sources: usize,
    /// Size of the unified timeline.
    pub events: usize,
    /// Composite frames written to the output.
    pub frames_written: u64,
    /// Total duration of the merged animation.
    pub total_duration_ms: u64,
}

/// Run the whole pipeline: extract every input, resize to the uniform height,
/// merge onto the unified timeline, and write one looping GIF.
///
/// Fail-fast: the first error aborts the merge. Encoding only starts after
/// merging succeeds, so a failed run never leaves a partial output behind.
#[tracing::instrument(skip(opts), fields(sources = inputs.len()))]
pub fn merge_files(
    inputs: &[PathBuf],
    out_path: &Path,
    opts: &MergeOptions,
) -> GifstripResult<MergeStats> {
    if inputs.is_empty() {
        return Err(GifstripError::invalid_parameter(
            "at least one input animation is required",
        ));
    }

    let timelines = extract_all(inputs, opts)?;
    let target_height = opts.height_policy.target_height(&timelines)?;
    tracing::debug!(target_height, "resolved uniform row height");

    let resized = resize_all(&timelines, target_height, opts)?;
    drop(timelines);

    let merged = merge(&resized)?;
    let stats = MergeStats {
        sources: inputs.len(),
        events: merged.len(),
        frames_written: merged.len() as u64,
        total_duration_ms: merged.total_duration_ms(),
    };
    tracing::debug!(
        events = stats.events,
        total_duration_ms = stats.total_duration_ms,
        "writing merged animation"
    );

    write_animation(
        &EncodeConfig::new(out_path),
        merged.frames,
        &merged.durations_ms,
    )?;
    Ok(stats)
}

fn extract_all(inputs: &[PathBuf], opts: &MergeOptions) -> GifstripResult<Vec<SourceTimeline>> {
    if opts.parallel {
        in_pool(opts.threads, || {
            inputs.par_iter().map(|p| extract_path(p)).collect()
        })
    } else {
        inputs.iter().map(|p| extract_path(p)).collect()
    }
}

fn resize_all(
    timelines: &[SourceTimeline],
    target_height: u32,
    opts: &MergeOptions,
) -> GifstripResult<Vec<SourceTimeline>> {
    if opts.parallel {
        in_pool(opts.threads, || {
            timelines
                .par_iter()
                .map(|t| resize_timeline(t, target_height))
                .collect()
        })
    } else {
        timelines
            .iter()
            .map(|t| resize_timeline(t, target_height))
            .collect()
    }
}

/// Run `job` on a dedicated pool when an explicit thread count was requested,
/// otherwise on rayon's global pool.
fn in_pool<T: Send>(
    threads: Option<usize>,
    job: impl FnOnce() -> GifstripResult<T> + Send,
) -> GifstripResult<T> {
    let Some(threads) = threads else {
        return job();
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| {
            GifstripError::invalid_parameter(format!("failed to build worker pool: {e}"))
        })?;
    pool.install(job)
}
