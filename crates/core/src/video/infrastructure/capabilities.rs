use crate::shared::constants::{MAX_AVCODEC_MAJOR, MIN_AVCODEC_MAJOR};
use crate::shared::error::ConvertError;

/// Initializes FFmpeg and confirms that `codec_name` names a usable video
/// encoder on a supported libavcodec release.
///
/// Runs before any file I/O so environment problems surface with their own
/// status codes.
pub fn check_encoder(codec_name: &str) -> Result<ffmpeg_next::codec::Codec, ConvertError> {
    ffmpeg_next::init()
        .map_err(|e| ConvertError::MissingCapability(format!("FFmpeg failed to initialize: {e}")))?;

    let major = avcodec_major(ffmpeg_next::codec::version());
    check_avcodec_major(major)?;

    let codec = ffmpeg_next::encoder::find_by_name(codec_name).ok_or_else(|| {
        ConvertError::MissingCapability(format!("encoder '{codec_name}' not found"))
    })?;
    if codec.medium() != ffmpeg_next::media::Type::Video {
        return Err(ConvertError::MissingCapability(format!(
            "encoder '{codec_name}' is not a video encoder"
        )));
    }

    log::debug!("Using encoder {} (libavcodec {major})", codec.name());
    Ok(codec)
}

/// Major component of a packed `AV_VERSION_INT` value.
pub fn avcodec_major(version: u32) -> u32 {
    version >> 16
}

pub fn check_avcodec_major(major: u32) -> Result<(), ConvertError> {
    if (MIN_AVCODEC_MAJOR..=MAX_AVCODEC_MAJOR).contains(&major) {
        Ok(())
    } else {
        Err(ConvertError::UnsupportedRuntime(format!(
            "libavcodec {major} is outside the supported range \
             {MIN_AVCODEC_MAJOR}..={MAX_AVCODEC_MAJOR}"
        )))
    }
}
