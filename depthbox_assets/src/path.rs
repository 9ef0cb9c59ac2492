use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Identifies a persisted artifact by the directory it lives in (relative to the database root)
/// and its name. Names never carry an extension, the database decides how an artifact is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetPath {
    dir: PathBuf,
    name: String,
}

impl AssetPath {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Splits `dir/sub/name` at the last separator. A string without a separator is a name in the
    /// root directory.
    pub fn parse(path: &str) -> Self {
        match path.rsplit_once('/') {
            Some((dir, name)) => Self::new(dir, name),
            None => Self::new(PathBuf::new(), path),
        }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name is usable as a single file stem
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && !self.name.contains(['/', '\\'])
            && self.name != "."
            && self.name != ".."
    }
}

impl Display for AssetPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.dir.as_os_str().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.dir.display(), self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_at_last_separator() {
        let path = AssetPath::parse("skyboxes/beach/beach_rgb");
        assert_eq!(path.dir(), Path::new("skyboxes/beach"));
        assert_eq!(path.name(), "beach_rgb");
        assert_eq!(path.to_string(), "skyboxes/beach/beach_rgb");

        let bare = AssetPath::parse("beach");
        assert_eq!(bare.dir(), Path::new(""));
        assert_eq!(bare.to_string(), "beach");
    }

    #[test]
    fn invalid_names() {
        assert!(!AssetPath::new("a", "").is_valid());
        assert!(!AssetPath::new("a", "b/c").is_valid());
        assert!(!AssetPath::new("a", "..").is_valid());
        assert!(AssetPath::new("a", "beach_depth").is_valid());
    }
}
