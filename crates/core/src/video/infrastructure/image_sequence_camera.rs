use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::video::domain::camera::Camera;

/// Frame delay approximating a live feed cadence.
const FRAME_DELAY: Duration = Duration::from_millis(10);

/// Camera fed from a directory of still images, served in filename order.
///
/// Stands in for a live video source during offline runs and tests. With
/// looping enabled the sequence wraps around at the end; without it, reads
/// past the end report a transient error each time, which the capture loop
/// treats as a retry.
pub struct ImageSequenceCamera {
    paths: Vec<PathBuf>,
    next: usize,
    index: usize,
    looping: bool,
}

impl ImageSequenceCamera {
    pub fn open(dir: &Path, looping: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_image(p))
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(format!("no image files in {}", dir.display()).into());
        }
        Ok(Self {
            paths,
            next: 0,
            index: 0,
            looping,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

impl Camera for ImageSequenceCamera {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        if self.next >= self.paths.len() {
            if self.looping {
                self.next = 0;
            } else {
                // Pace the caller's retry loop; the sequence stays exhausted.
                std::thread::sleep(FRAME_DELAY);
                return Err("image sequence exhausted".into());
            }
        }

        let path = &self.paths[self.next];
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let frame = Frame::new(rgb.into_raw(), width, height, 3, self.index);

        self.next += 1;
        self.index += 1;
        std::thread::sleep(FRAME_DELAY);
        Ok(frame)
    }
}
