use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use frameseq_core::pipeline::frames_to_video_use_case::{
    ConversionReport, ConvertConfig, FramesToVideoUseCase,
};
use frameseq_core::pipeline::pipeline_logger::LogPipelineLogger;
use frameseq_core::sequence::infrastructure::directory_frame_source::DirectoryFrameSource;
use frameseq_core::shared::constants::{
    DEFAULT_CODEC, DEFAULT_FPS, DEFAULT_FRAME_DIR, DEFAULT_FRAME_EXTENSION,
};
use frameseq_core::shared::error::ConvertError;
use frameseq_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use frameseq_core::video::infrastructure::image_file_reader::ImageFileReader;

/// Status marker for arguments clap could not parse.
const USAGE_STATUS: i32 = 3;

/// Assemble a folder of numbered image frames into a video.
///
/// Prints a single status marker to stdout: 0 on success, 1 when FFmpeg or
/// the requested encoder is unavailable, 2 for an unsupported FFmpeg release,
/// 3 for any other failure.
#[derive(Parser, Debug)]
#[command(name = "frames-to-video", version)]
struct Cli {
    /// Output video file; the container follows the extension (.avi, .mp4, .mkv).
    output: PathBuf,

    /// Directory holding the frames.
    #[arg(default_value = DEFAULT_FRAME_DIR)]
    frame_dir: PathBuf,

    /// Frame file suffix (case-sensitive).
    #[arg(long, default_value = DEFAULT_FRAME_EXTENSION)]
    extension: String,

    /// Playback rate in frames per second.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// FFmpeg encoder name (e.g. mpeg4, libx264, ffv1).
    #[arg(long, default_value = DEFAULT_CODEC)]
    codec: String,

    /// Encode at most this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Delete the frame files after a successful export.
    #[arg(long)]
    remove_frames: bool,
}

impl Cli {
    fn into_config(self) -> ConvertConfig {
        ConvertConfig {
            frame_dir: self.frame_dir,
            output: self.output,
            extension: self.extension,
            fps: self.fps,
            codec: self.codec,
            max_frames: self.max_frames,
            remove_frames: self.remove_frames,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            exit_with(USAGE_STATUS);
        }
    };

    match run(cli.into_config()) {
        Ok(report) => {
            log::info!(
                "Export complete: {} frames ({}) at {} fps",
                report.frames_written,
                report.dimensions,
                report.fps
            );
            exit_with(0);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_with(e.status_code());
        }
    }
}

fn run(config: ConvertConfig) -> Result<ConversionReport, ConvertError> {
    let mut use_case = FramesToVideoUseCase::new(
        Box::new(DirectoryFrameSource::new()),
        Box::new(ImageFileReader::new()),
        Box::new(FfmpegWriter::new()),
        Box::new(LogPipelineLogger::default()),
    );
    use_case.execute(&config)
}

/// Prints the bare status digit (no newline; callers compare stdout
/// exactly) and exits with it.
fn exit_with(status: i32) -> ! {
    let mut stdout = std::io::stdout();
    if let Err(e) = write!(stdout, "{status}").and_then(|()| stdout.flush()) {
        log::warn!("Failed to report status {status}: {e}");
    }
    process::exit(status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_output_only_uses_defaults() {
        let cli = Cli::try_parse_from(["frames-to-video", "movie.avi"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config, ConvertConfig::new("movie.avi"));
    }

    #[test]
    fn test_second_positional_is_frame_dir() {
        let cli = Cli::try_parse_from(["frames-to-video", "movie.avi", "renders"]).unwrap();
        assert_eq!(cli.into_config().frame_dir, PathBuf::from("renders"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "frames-to-video",
            "out.mkv",
            "shots",
            "--extension",
            "jpg",
            "--fps",
            "24",
            "--codec",
            "ffv1",
            "--max-frames",
            "10",
            "--remove-frames",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.extension, "jpg");
        assert_eq!(config.fps, 24);
        assert_eq!(config.codec, "ffv1");
        assert_eq!(config.max_frames, Some(10));
        assert!(config.remove_frames);
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["frames-to-video"]).is_err());
    }

    #[test]
    fn test_run_reports_empty_input() {
        let frames = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let config = ConvertConfig::new(out.path().join("out.avi")).with_frame_dir(frames.path());

        let err = run(config).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput { .. }));
        assert_eq!(err.status_code(), 3);
    }

    #[test]
    fn test_run_writes_video() {
        let frames = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for i in [1, 2, 10] {
            image::RgbImage::from_pixel(32, 16, image::Rgb([i * 20, 0, 0]))
                .save(frames.path().join(format!("f{i}.png")))
                .unwrap();
        }
        let config = ConvertConfig::new(out.path().join("out.avi")).with_frame_dir(frames.path());

        let report = run(config).unwrap();
        assert_eq!(report.frames_written, 3);
        assert!(report.output.exists());
    }
}
