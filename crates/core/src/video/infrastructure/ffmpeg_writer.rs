use std::path::Path;

use crate::shared::error::ConvertError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::{FrameDimensions, VideoMetadata};
use crate::video::domain::video_writer::VideoWriter;
use crate::video::infrastructure::capabilities::check_encoder;

/// Encodes RGB frames into a video file via ffmpeg-next.
///
/// The container is chosen by FFmpeg from the output extension; the encoder
/// is looked up by name from [`VideoMetadata::codec`]. If the writer is
/// dropped while open, the stream is finalized so the file is never left
/// without a trailer.
pub struct FfmpegWriter {
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    dimensions: FrameDimensions,
    time_base: ffmpeg_next::Rational,
    frame_count: usize,
    video_stream_index: usize,
}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            octx: None,
            encoder: None,
            scaler: None,
            dimensions: FrameDimensions::new(0, 0),
            time_base: ffmpeg_next::Rational(1, 1),
            frame_count: 0,
            video_stream_index: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frame_count
    }

    /// Flushes the encoder and writes the container trailer.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.send_eof()?;
        }
        self.drain_packets()?;
        if let Some(octx) = self.octx.as_mut() {
            octx.write_trailer()?;
        }
        Ok(())
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(octx)) = (self.encoder.as_mut(), self.octx.as_mut()) else {
            return Err("FfmpegWriter: not opened".into());
        };
        let ost_time_base = octx
            .stream(self.video_stream_index)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        loop {
            match encoder.receive_packet(&mut encoded) {
                Ok(()) => {
                    encoded.set_stream(self.video_stream_index);
                    encoded.rescale_ts(self.time_base, ost_time_base);
                    encoded.write_interleaved(octx)?;
                }
                Err(e) if is_drained(&e) => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn check_available(&self, codec: &str) -> Result<(), ConvertError> {
        check_encoder(codec).map(|_| ())
    }

    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.encoder.is_some() {
            return Err("FfmpegWriter: already open".into());
        }
        if metadata.fps == 0 {
            return Err("frame rate must be positive".into());
        }

        let codec = check_encoder(&metadata.codec)?;
        let dims = metadata.dimensions;
        let fps = i32::try_from(metadata.fps)?;
        let time_base = ffmpeg_next::Rational(1, fps);

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        let pixel_format = encoder_pixel_format(codec);
        encoder_ctx.set_width(dims.width);
        encoder_ctx.set_height(dims.height);
        encoder_ctx.set_format(pixel_format);
        encoder_ctx.set_time_base(time_base);
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        ost.set_time_base(time_base);
        let video_stream_index = ost.index();

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            dims.width,
            dims.height,
            pixel_format,
            dims.width,
            dims.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::debug!(
            "Opened {} ({} {dims} @ {fps} fps, {pixel_format:?})",
            path.display(),
            metadata.codec
        );

        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.dimensions = dims;
        self.time_base = time_base;
        self.frame_count = 0;
        self.video_stream_index = video_stream_index;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.dimensions() != self.dimensions {
            return Err(format!(
                "frame {} is {}, stream expects {}",
                frame.index(),
                frame.dimensions(),
                self.dimensions
            )
            .into());
        }
        let encoder = self.encoder.as_mut().ok_or("FfmpegWriter: not opened")?;
        let scaler = self.scaler.as_mut().ok_or("FfmpegWriter: not opened")?;

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            self.dimensions.width,
            self.dimensions.height,
        );

        // Source rows are packed, destination rows are padded to `stride`.
        let stride = rgb_frame.stride(0);
        let row_len = frame.row_len();
        let dst = rgb_frame.data_mut(0);
        for (row, src_row) in frame.data().chunks_exact(row_len).enumerate() {
            let start = row * stride;
            dst[start..start + row_len].copy_from_slice(src_row);
        }

        let mut converted = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&rgb_frame, &mut converted)?;
        converted.set_pts(Some(self.frame_count as i64));

        encoder.send_frame(&converted)?;
        self.drain_packets()?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.encoder.is_none() {
            return Ok(());
        }

        let result = self.finish();

        self.octx = None;
        self.encoder = None;
        self.scaler = None;

        result
    }
}

impl Drop for FfmpegWriter {
    fn drop(&mut self) {
        if self.encoder.is_some() {
            if let Err(e) = self.close() {
                log::warn!("Failed to finalize video on drop: {e}");
            }
        }
    }
}

/// Whether `receive_packet` failed only because no packet is ready yet
/// (EAGAIN) or the encoder is fully flushed (EOF).
fn is_drained(err: &ffmpeg_next::Error) -> bool {
    match err {
        ffmpeg_next::Error::Eof => true,
        ffmpeg_next::Error::Other { errno } => *errno == ffmpeg_next::util::error::EAGAIN,
        _ => false,
    }
}

/// YUV420P when the encoder accepts it, otherwise its first listed format.
fn encoder_pixel_format(codec: ffmpeg_next::codec::Codec) -> ffmpeg_next::format::Pixel {
    let preferred = ffmpeg_next::format::Pixel::YUV420P;
    let supported: Vec<_> = codec
        .video()
        .ok()
        .and_then(|video| video.formats())
        .map(|formats| formats.collect())
        .unwrap_or_default();

    if supported.is_empty() || supported.contains(&preferred) {
        preferred
    } else {
        supported[0]
    }
}
