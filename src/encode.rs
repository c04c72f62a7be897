use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::{
    Delay, Frame, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::error::{GifstripError, GifstripResult};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    pub fn validate(&self) -> GifstripResult<()> {
        if self.out_path.as_os_str().is_empty() {
            return Err(GifstripError::invalid_parameter(
                "output path must not be empty",
            ));
        }
        Ok(())
    }
}

pub fn ensure_parent_dir(path: &Path) -> GifstripResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            GifstripError::write(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Streams composite frames into a looping animated GIF.
pub struct GifWriter {
    out_path: PathBuf,
    encoder: GifEncoder<BufWriter<File>>,
}

impl GifWriter {
    pub fn create(cfg: &EncodeConfig) -> GifstripResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(GifstripError::write(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        let file = File::create(&cfg.out_path).map_err(|e| {
            GifstripError::write(format!(
                "failed to create '{}': {e}",
                cfg.out_path.display()
            ))
        })?;

        // Speed 1 is the slowest, highest-quality quantization pass, so
        // composited detail is not optimized away.
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 1);
        encoder.set_repeat(Repeat::Infinite).map_err(|e| {
            GifstripError::write(format!(
                "failed to set loop metadata on '{}': {e}",
                cfg.out_path.display()
            ))
        })?;

        Ok(Self {
            out_path: cfg.out_path.clone(),
            encoder,
        })
    }

    pub fn write_frame(&mut self, image: RgbaImage, duration_ms: u32) -> GifstripResult<()> {
        let delay = Delay::from_numer_denom_ms(duration_ms, 1);
        self.encoder
            .encode_frame(Frame::from_parts(image, 0, 0, delay))
            .map_err(|e| {
                GifstripError::write(format!(
                    "failed to encode frame into '{}': {e}",
                    self.out_path.display()
                ))
            })
    }

    /// Finalize the file. The encoder writes the GIF trailer when dropped.
    pub fn finish(self) -> GifstripResult<()> {
        drop(self.encoder);
        Ok(())
    }
}

/// Write a full composite sequence with per-frame durations as one looping
/// GIF.
pub fn write_animation(
    cfg: &EncodeConfig,
    frames: Vec<RgbaImage>,
    durations_ms: &[u32],
) -> GifstripResult<()> {
    if frames.is_empty() {
        return Err(GifstripError::invalid_parameter("no frames to write"));
    }
    if frames.len() != durations_ms.len() {
        return Err(GifstripError::invalid_parameter(format!(
            "frame/duration count mismatch: {} frames vs {} durations",
            frames.len(),
            durations_ms.len()
        )));
    }

    let mut writer = GifWriter::create(cfg)?;
    for (image, &duration_ms) in frames.into_iter().zip(durations_ms) {
        writer.write_frame(image, duration_ms)?;
    }
    writer.finish()
}
