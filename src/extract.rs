use std::{fs::File, io::BufReader, path::Path};

use image::{AnimationDecoder, Delay, codecs::gif::GifDecoder};

use crate::{
    error::{GifstripError, GifstripResult},
    timeline::{DEFAULT_FRAME_DURATION_MS, SourceTimeline, TimedFrame},
};

/// Drain every frame of a decoded animation into an owned [`SourceTimeline`].
///
/// Each frame is moved into its own buffer, so nothing aliases the decoder's
/// internal canvas once extraction returns. Frames without timing metadata
/// get [`DEFAULT_FRAME_DURATION_MS`].
pub fn extract<'a>(decoder: impl AnimationDecoder<'a>) -> GifstripResult<SourceTimeline> {
    let mut frames = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame.map_err(|e| {
            GifstripError::decode(format!("failed to decode frame {}: {e}", frames.len()))
        })?;
        let duration_ms = delay_to_ms(frame.delay());
        frames.push(TimedFrame {
            image: frame.into_buffer(),
            duration_ms,
        });
    }
    SourceTimeline::new(frames)
}

/// Open an animated GIF and extract its full timeline.
///
/// The decode handle lives only for the duration of this call; it is fully
/// drained and released before the caller ever merges.
pub fn extract_path(path: &Path) -> GifstripResult<SourceTimeline> {
    let file = File::open(path)
        .map_err(|e| GifstripError::decode(format!("failed to open '{}': {e}", path.display())))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| {
        GifstripError::decode(format!("failed to read '{}' as a GIF: {e}", path.display()))
    })?;
    extract(decoder).map_err(|e| match e {
        GifstripError::EmptyTimeline(_) => GifstripError::empty_timeline(format!(
            "'{}' contains no frames",
            path.display()
        )),
        other => other,
    })
}

fn delay_to_ms(delay: Delay) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    if numer == 0 || denom == 0 {
        return DEFAULT_FRAME_DURATION_MS;
    }
    // Round the rational delay to whole milliseconds, keeping it positive.
    let ms = (u64::from(numer) + u64::from(denom) / 2) / u64::from(denom);
    ms.clamp(1, u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Frame, RgbaImage, codecs::gif::GifEncoder};

    use super::*;

    fn encode_gif(frames: Vec<(RgbaImage, u32)>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut enc = GifEncoder::new(&mut buf);
            for (image, ms) in frames {
                enc.encode_frame(Frame::from_parts(
                    image,
                    0,
                    0,
                    Delay::from_numer_denom_ms(ms, 1),
                ))
                .unwrap();
            }
        }
        buf
    }

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba(rgba))
    }

    #[test]
    fn extract_reads_frames_and_durations() {
        let bytes = encode_gif(vec![
            (solid(4, 4, [255, 0, 0, 255]), 50),
            (solid(4, 4, [0, 255, 0, 255]), 120),
        ]);

        let decoder = GifDecoder::new(Cursor::new(bytes)).unwrap();
        let tl = extract(decoder).unwrap();
        assert_eq!(tl.len(), 2);
        assert_eq!(tl.frames()[0].duration_ms, 50);
        assert_eq!(tl.frames()[1].duration_ms, 120);
        assert_eq!(tl.frames()[0].image.dimensions(), (4, 4));
    }

    #[test]
    fn zero_delay_defaults_to_100ms() {
        let bytes = encode_gif(vec![(solid(2, 2, [0, 0, 255, 255]), 0)]);
        let decoder = GifDecoder::new(Cursor::new(bytes)).unwrap();
        let tl = extract(decoder).unwrap();
        assert_eq!(tl.frames()[0].duration_ms, DEFAULT_FRAME_DURATION_MS);
    }

    #[test]
    fn extract_path_missing_file_is_decode_error() {
        let err = extract_path(Path::new("definitely/not/here.gif")).unwrap_err();
        assert!(matches!(err, GifstripError::Decode(_)));
        assert!(err.to_string().contains("not/here.gif"));
    }

    #[test]
    fn delay_rounding_is_to_nearest_ms() {
        assert_eq!(delay_to_ms(Delay::from_numer_denom_ms(50, 1)), 50);
        assert_eq!(delay_to_ms(Delay::from_numer_denom_ms(0, 1)), 100);
        assert_eq!(delay_to_ms(Delay::from_numer_denom_ms(3, 2)), 2);
    }
}
