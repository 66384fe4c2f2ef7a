//! Path helpers for side-files
//!
//! Every artifact belonging to a record lives next to its primary media
//! file and shares its stem, e.g. `/data/a.mp4`, `/data/a.json`,
//! `/data/a.srt`.

use std::path::{Path, PathBuf};

/// Replace the extension of the last path component.
///
/// `ext` may be given with or without the leading dot. A path without an
/// extension gets one appended.
pub fn replace_extension(path: impl AsRef<Path>, ext: &str) -> PathBuf {
    let ext = ext.trim_start_matches('.');
    path.as_ref().with_extension(ext)
}

/// Final component of a path, without any directory parts
pub fn base_name(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_extension() {
        assert_eq!(
            replace_extension("/data/a.mp4", ".json"),
            PathBuf::from("/data/a.json")
        );
        assert_eq!(
            replace_extension("/data/a.mp4", "srt"),
            PathBuf::from("/data/a.srt")
        );
        assert_eq!(
            replace_extension("relative/clip.flv", ".srt"),
            PathBuf::from("relative/clip.srt")
        );
    }

    #[test]
    fn test_replace_extension_only_touches_file_name() {
        assert_eq!(
            replace_extension("/data/v1.2/a", ".srt"),
            PathBuf::from("/data/v1.2/a.srt")
        );
        assert_eq!(
            replace_extension("/data/a.part.mp4", ".json"),
            PathBuf::from("/data/a.part.json")
        );
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/data/a.srt"), Some("a.srt".to_string()));
        assert_eq!(base_name("a.srt"), Some("a.srt".to_string()));
        assert_eq!(base_name("/"), None);
    }
}
