use image::imageops::{self, FilterType};

use crate::{
    error::{GifstripError, GifstripResult},
    timeline::{SourceTimeline, TimedFrame},
};

/// Rescale every frame of a timeline to `target_height`, preserving each
/// frame's aspect ratio. Durations are carried over unchanged.
///
/// Widths are rounded to the nearest pixel, so a +-1px drift between frames
/// of the same source is possible and accepted.
pub fn resize_timeline(
    timeline: &SourceTimeline,
    target_height: u32,
) -> GifstripResult<SourceTimeline> {
    if target_height == 0 {
        return Err(GifstripError::invalid_parameter(
            "target height must be positive",
        ));
    }

    let mut resized = Vec::with_capacity(timeline.len());
    for (idx, frame) in timeline.frames().iter().enumerate() {
        let (width, height) = frame.image.dimensions();
        if width == 0 || height == 0 {
            return Err(GifstripError::invalid_frame(format!(
                "frame {idx} has degenerate geometry ({width}x{height})"
            )));
        }

        let image = if height == target_height {
            // Identity scale; the rounded width is exactly the source width.
            frame.image.clone()
        } else {
            let new_width = scaled_width(width, height, target_height);
            imageops::resize(&frame.image, new_width, target_height, FilterType::Lanczos3)
        };

        resized.push(TimedFrame {
            image,
            duration_ms: frame.duration_ms,
        });
    }

    SourceTimeline::new(resized)
}

fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    let scaled = f64::from(target_height) * f64::from(width) / f64::from(height);
    (scaled.round() as u32).max(1)
}
