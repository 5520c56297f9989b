use std::path::{Path, PathBuf};

/// One still image of a sequence, as found in a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFile {
    pub path: PathBuf,
    /// File name used for ordering.
    pub name: String,
}

impl FrameFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// Lists the frame files of a sequence.
///
/// Implementations return files in a deterministic but unspecified order;
/// playback order is resolved separately.
pub trait FrameSource {
    fn list(
        &self,
        dir: &Path,
        extension: &str,
    ) -> Result<Vec<FrameFile>, Box<dyn std::error::Error>>;
}
