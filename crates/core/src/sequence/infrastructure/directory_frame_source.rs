use std::fs;
use std::path::Path;

use crate::sequence::domain::frame_source::{FrameFile, FrameSource};

/// Lists the top level of a directory for files ending in `.<extension>`.
///
/// The suffix match is case-sensitive and subdirectories are not searched.
/// Results come back sorted by raw file name so the listing does not depend
/// on the filesystem's iteration order.
pub struct DirectoryFrameSource;

impl DirectoryFrameSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DirectoryFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for DirectoryFrameSource {
    fn list(
        &self,
        dir: &Path,
        extension: &str,
    ) -> Result<Vec<FrameFile>, Box<dyn std::error::Error>> {
        let suffix = format!(".{extension}");
        let mut frames = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let frame = FrameFile::new(entry.path());
            if frame.name.ends_with(&suffix) {
                frames.push(frame);
            }
        }

        frames.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!("Found {} *{suffix} files in {}", frames.len(), dir.display());
        Ok(frames)
    }
}
