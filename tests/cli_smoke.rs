use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process::Command,
};

use image::{
    AnimationDecoder, Delay, Frame, Rgba, RgbaImage,
    codecs::gif::{GifDecoder, GifEncoder},
};

fn temp_root(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "gifstrip_cli_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&root).unwrap();
    root
}

fn write_fixture(path: &Path, frames: Vec<(RgbaImage, u32)>) {
    let mut enc = GifEncoder::new(File::create(path).unwrap());
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

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(rgba))
}

fn bin() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_gifstrip")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "gifstrip.exe"
            } else {
                "gifstrip"
            });
            p
        })
}

#[test]
fn cli_merge_writes_a_decodable_gif() {
    let root = temp_root("merge");
    let a = root.join("a.gif");
    let b = root.join("b.gif");
    let out = root.join("out.gif");

    write_fixture(
        &a,
        vec![
            (solid(6, 6, [255, 0, 0, 255]), 100),
            (solid(6, 6, [0, 255, 0, 255]), 100),
        ],
    );
    write_fixture(&b, vec![(solid(6, 6, [0, 0, 255, 255]), 50)]);

    let status = Command::new(bin())
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out.exists());

    let frames = GifDecoder::new(BufReader::new(File::open(&out).unwrap()))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    // End-times {100, 200} and {50}: three unified instants.
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.buffer().dimensions(), (12, 6));
    }
}

#[test]
fn cli_merge_rejects_a_single_input() {
    let root = temp_root("single");
    let a = root.join("a.gif");
    write_fixture(&a, vec![(solid(4, 4, [255, 0, 0, 255]), 100)]);

    let status = Command::new(bin())
        .arg("merge")
        .arg(&a)
        .arg("--out")
        .arg(root.join("out.gif"))
        .status()
        .unwrap();

    assert!(!status.success());
    assert!(!root.join("out.gif").exists());
}

#[test]
fn cli_merge_fails_nonzero_on_undecodable_input() {
    let root = temp_root("bad_input");
    let a = root.join("a.gif");
    let b = root.join("b.gif");
    write_fixture(&a, vec![(solid(4, 4, [255, 0, 0, 255]), 100)]);
    std::fs::write(&b, b"not a gif").unwrap();

    let out = Command::new(bin())
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .arg("--out")
        .arg(root.join("out.gif"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("b.gif"));
}

#[test]
fn cli_probe_emits_a_json_report() {
    let root = temp_root("probe");
    let a = root.join("a.gif");
    write_fixture(
        &a,
        vec![
            (solid(8, 6, [255, 0, 0, 255]), 40),
            (solid(8, 6, [0, 255, 0, 255]), 60),
        ],
    );

    let out = Command::new(bin()).arg("probe").arg(&a).output().unwrap();
    assert!(out.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(reports[0]["frame_count"], 2);
    assert_eq!(reports[0]["height"], 6);
    assert_eq!(reports[0]["total_duration_ms"], 100);
}
