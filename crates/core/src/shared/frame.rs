use super::video_metadata::FrameDimensions;

/// A decoded still image: contiguous RGB24 bytes in row-major order.
///
/// `index` is the frame's position in playback order, assigned by the
/// pipeline after order resolution.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.width, self.height)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Bytes per row of packed pixel data.
    pub fn row_len(&self) -> usize {
        self.width as usize * Self::CHANNELS
    }
}
