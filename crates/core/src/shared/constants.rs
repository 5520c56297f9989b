/// Folder read when no frame directory is given on the command line.
pub const DEFAULT_FRAME_DIR: &str = "frames_tmp";

/// Image suffix matched by the enumerator (case-sensitive).
pub const DEFAULT_FRAME_EXTENSION: &str = "png";

/// Playback rate of the assembled video.
pub const DEFAULT_FPS: u32 = 30;

/// Encoder name passed to `ffmpeg_next::encoder::find_by_name`.
pub const DEFAULT_CODEC: &str = "mpeg4";

/// Supported libavcodec major versions (FFmpeg 4.x through 7.x).
pub const MIN_AVCODEC_MAJOR: u32 = 58;
pub const MAX_AVCODEC_MAJOR: u32 = 61;
