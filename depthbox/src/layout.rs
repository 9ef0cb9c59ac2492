use depthbox_assets::AssetPath;
use std::path::{Path, PathBuf};

/// Paths of the four artifacts derived for one skybox.
///
/// Everything lands in a single staging directory, artifacts are named after the skybox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagingLayout {
    dir: PathBuf,
    name: String,
}

impl StagingLayout {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
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

    pub fn color(&self) -> AssetPath {
        AssetPath::new(self.dir.clone(), format!("{}_rgb", self.name))
    }

    pub fn depth(&self) -> AssetPath {
        AssetPath::new(self.dir.clone(), format!("{}_depth", self.name))
    }

    pub fn material(&self) -> AssetPath {
        AssetPath::new(self.dir.clone(), format!("{}_material", self.name))
    }

    pub fn prefab(&self) -> AssetPath {
        AssetPath::new(self.dir.clone(), self.name.clone())
    }

    pub fn artifacts(&self) -> [AssetPath; 4] {
        [self.color(), self.depth(), self.material(), self.prefab()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_share_the_staging_directory() {
        let layout = StagingLayout::new("skyboxes/beach", "beach");
        let names: Vec<String> = layout.artifacts().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            names,
            [
                "skyboxes/beach/beach_rgb",
                "skyboxes/beach/beach_depth",
                "skyboxes/beach/beach_material",
                "skyboxes/beach/beach",
            ]
        );
    }

    #[test]
    fn directory_and_name_may_differ() {
        let layout = StagingLayout::new("skyboxes/8f2c", "harbor");
        assert_eq!(layout.color(), AssetPath::parse("skyboxes/8f2c/harbor_rgb"));
        assert_eq!(layout.dir(), Path::new("skyboxes/8f2c"));
    }
}
