use std::fmt;

/// Width and height of every frame in a sequence, taken from the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for FrameDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parameters a video stream is opened with.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub dimensions: FrameDimensions,
    pub fps: u32,
    pub total_frames: usize,
    pub codec: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let meta = VideoMetadata {
            dimensions: FrameDimensions::new(1920, 1080),
            fps: 30,
            total_frames: 900,
            codec: "mpeg4".to_string(),
        };
        assert_eq!(meta.dimensions.width, 1920);
        assert_eq!(meta.dimensions.height, 1080);
        assert_eq!(meta.fps, 30);
        assert_eq!(meta.total_frames, 900);
        assert_eq!(meta.codec, "mpeg4");
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(FrameDimensions::new(100, 50).to_string(), "100x50");
    }
}
