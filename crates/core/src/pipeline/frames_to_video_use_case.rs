use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::sequence::domain::frame_source::{FrameFile, FrameSource};
use crate::sequence::domain::natural_order::resolve_order;
use crate::shared::constants::{
    DEFAULT_CODEC, DEFAULT_FPS, DEFAULT_FRAME_DIR, DEFAULT_FRAME_EXTENSION,
};
use crate::shared::error::ConvertError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::{FrameDimensions, VideoMetadata};
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::video_writer::VideoWriter;

/// Inputs of one conversion run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertConfig {
    pub frame_dir: PathBuf,
    pub output: PathBuf,
    /// File suffix without the dot, matched case-sensitively.
    pub extension: String,
    pub fps: u32,
    /// Encoder name, e.g. `mpeg4`, `libx264`, `ffv1`.
    pub codec: String,
    /// Stop after this many frames in playback order.
    pub max_frames: Option<usize>,
    /// Delete the source frames after a successful export.
    pub remove_frames: bool,
}

impl ConvertConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            frame_dir: PathBuf::from(DEFAULT_FRAME_DIR),
            output: output.into(),
            extension: DEFAULT_FRAME_EXTENSION.to_string(),
            fps: DEFAULT_FPS,
            codec: DEFAULT_CODEC.to_string(),
            max_frames: None,
            remove_frames: false,
        }
    }

    pub fn with_frame_dir(mut self, frame_dir: impl Into<PathBuf>) -> Self {
        self.frame_dir = frame_dir.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.fps == 0 {
            return Err(ConvertError::InvalidConfig(
                "frame rate must be positive".into(),
            ));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConvertError::InvalidConfig(format!(
                "extension must be a bare suffix like 'png', got '{}'",
                self.extension
            )));
        }
        if self.codec.is_empty() {
            return Err(ConvertError::InvalidConfig("codec must not be empty".into()));
        }
        if self.max_frames == Some(0) {
            return Err(ConvertError::InvalidConfig(
                "max frames must be at least 1".into(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConvertError::InvalidConfig("output path is empty".into()));
        }
        Ok(())
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionReport {
    pub output: PathBuf,
    pub frames_written: usize,
    pub dimensions: FrameDimensions,
    pub fps: u32,
    pub codec: String,
}

/// Enumerate → order → encode pipeline.
///
/// Frames are decoded and appended one at a time in natural filename order.
/// The first frame fixes the output dimensions. Any failure after the output
/// stream is opened closes the stream and removes the partial file.
pub struct FramesToVideoUseCase {
    source: Box<dyn FrameSource>,
    reader: Box<dyn ImageReader>,
    writer: Box<dyn VideoWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl FramesToVideoUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        reader: Box<dyn ImageReader>,
        writer: Box<dyn VideoWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source,
            reader,
            writer,
            logger,
        }
    }

    pub fn execute(&mut self, config: &ConvertConfig) -> Result<ConversionReport, ConvertError> {
        config.validate()?;
        self.writer.check_available(&config.codec)?;

        let frames = self.enumerate(config)?;
        let first = self.decode(&frames[0], 0)?;
        let dimensions = first.dimensions();
        self.logger.info(&format!(
            "Encoding {} frames ({dimensions} @ {} fps, {}) to {}",
            frames.len(),
            config.fps,
            config.codec,
            config.output.display()
        ));

        let metadata = VideoMetadata {
            dimensions,
            fps: config.fps,
            total_frames: frames.len(),
            codec: config.codec.clone(),
        };

        // The writer may have truncated the output before failing.
        if let Err(source) = self.writer.open(&config.output, &metadata) {
            discard_partial_output(&config.output);
            return Err(write_failure(&config.output, source));
        }

        let written = self.write_all(&frames, first, &config.output);
        let closed = self.writer.close();

        let frames_written = match (written, closed) {
            (Ok(count), Ok(())) => count,
            (Ok(_), Err(source)) => {
                discard_partial_output(&config.output);
                return Err(write_failure(&config.output, source));
            }
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    log::warn!("Failed to close video after error: {close_err}");
                }
                discard_partial_output(&config.output);
                return Err(e);
            }
        };

        self.logger.summary();
        self.logger
            .info(&format!("Output written to {}", config.output.display()));

        if config.remove_frames {
            remove_frame_files(&frames);
        }

        Ok(ConversionReport {
            output: config.output.clone(),
            frames_written,
            dimensions,
            fps: config.fps,
            codec: config.codec.clone(),
        })
    }

    fn enumerate(&self, config: &ConvertConfig) -> Result<Vec<FrameFile>, ConvertError> {
        let listed = self
            .source
            .list(&config.frame_dir, &config.extension)
            .map_err(|source| ConvertError::Enumeration {
                dir: config.frame_dir.clone(),
                source,
            })?;

        let mut frames = resolve_order(listed);
        if let Some(max) = config.max_frames {
            frames.truncate(max);
        }

        if frames.is_empty() {
            return Err(ConvertError::EmptyInput {
                dir: config.frame_dir.clone(),
                extension: config.extension.clone(),
            });
        }
        Ok(frames)
    }

    fn decode(&mut self, frame: &FrameFile, index: usize) -> Result<Frame, ConvertError> {
        let start = Instant::now();
        let decoded = self
            .reader
            .read(&frame.path, index)
            .map_err(|source| ConvertError::DecodeFailure {
                path: frame.path.clone(),
                source,
            })?;
        self.logger
            .timing("decode", start.elapsed().as_secs_f64() * 1000.0);
        Ok(decoded)
    }

    fn append(&mut self, frame: &Frame, output: &Path) -> Result<(), ConvertError> {
        let start = Instant::now();
        self.writer
            .write(frame)
            .map_err(|source| write_failure(output, source))?;
        self.logger
            .timing("encode", start.elapsed().as_secs_f64() * 1000.0);
        Ok(())
    }

    /// Appends `first` and then every remaining frame in order. Returns the
    /// number of frames written.
    fn write_all(
        &mut self,
        frames: &[FrameFile],
        first: Frame,
        output: &Path,
    ) -> Result<usize, ConvertError> {
        let total = frames.len();

        self.append(&first, output)?;
        self.logger.progress(1, total);

        for (index, file) in frames.iter().enumerate().skip(1) {
            let frame = self.decode(file, index)?;
            self.append(&frame, output)?;
            self.logger.progress(index + 1, total);
        }
        Ok(total)
    }
}

fn write_failure(output: &Path, source: Box<dyn std::error::Error>) -> ConvertError {
    ConvertError::WriteFailure {
        path: output.to_path_buf(),
        source,
    }
}

fn discard_partial_output(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => log::debug!("Removed partial output {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove partial output {}: {e}", output.display()),
    }
}

fn remove_frame_files(frames: &[FrameFile]) {
    let mut removed = 0;
    for frame in frames {
        match fs::remove_file(&frame.path) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Could not remove frame {}: {e}", frame.path.display()),
        }
    }
    log::info!("Removed {removed} source frames");
}
