use std::path::Path;

use crate::shared::error::ConvertError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Abstracts video encoding so the pipeline can write output without
/// depending on a specific codec library.
pub trait VideoWriter {
    /// Verifies the encoding backend and `codec` are usable before any file
    /// is touched.
    fn check_available(&self, _codec: &str) -> Result<(), ConvertError> {
        Ok(())
    }

    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Appends one frame. Frames must match the dimensions given to `open`.
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered packets and finalizes the container. Safe to call
    /// more than once; calls after the first are no-ops.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
