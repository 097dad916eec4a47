/// A single camera frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; pipeline code treats
/// pixel data as opaque except for the annotation helpers, which write
/// individual pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Writes one pixel. Out-of-bounds coordinates are ignored so callers
    /// can draw shapes that extend past the frame edges.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        for (i, &v) in color.iter().take(c).enumerate() {
            self.data[offset + i] = v;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        &self.data[offset..offset + c]
    }

    /// In-place horizontal mirror, matching the webcam "selfie view"
    /// orientation operators expect.
    pub fn mirror_horizontal(&mut self) {
        let w = self.width as usize;
        let c = self.channels as usize;
        for row in self.data.chunks_exact_mut(w * c) {
            for col in 0..w / 2 {
                let left = col * c;
                let right = (w - 1 - col) * c;
                for ch in 0..c {
                    row.swap(left + ch, right + ch);
                }
            }
        }
    }
}
