#![forbid(unsafe_code)]

pub mod encode;
pub mod error;
pub mod extract;
pub mod merge;
pub mod pipeline;
pub mod probe;
pub mod resize;
pub mod timeline;

pub use encode::{EncodeConfig, GifWriter, write_animation};
pub use error::{GifstripError, GifstripResult};
pub use extract::{extract, extract_path};
pub use merge::{HeightPolicy, MergedAnimation, merge};
pub use pipeline::{MergeOptions, MergeStats, merge_files};
pub use probe::{SourceReport, probe_path};
pub use resize::resize_timeline;
pub use timeline::{DEFAULT_FRAME_DURATION_MS, SourceTimeline, TimedFrame};
