use anyhow::Context;
use depthbox_assets::{AssetPath, ImportSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the template material slots a skybox fills in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSlots {
    pub color: String,
    pub depth: String,
    pub min_range: String,
    pub max_range: String,
}

impl Default for MaterialSlots {
    fn default() -> Self {
        Self {
            color: String::from("_MainTex"),
            depth: String::from("_DepthTex"),
            min_range: String::from("_Min"),
            max_range: String::from("_Max"),
        }
    }
}

/// Where in the base prefab the derived material goes.
///
/// `node` is a `/` separated path of node names below the prefab root, empty for the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererBinding {
    pub node: String,
    pub material_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    /// Database directory holding one subdirectory per skybox
    pub staging_root: PathBuf,
    pub template_material: AssetPath,
    pub base_prefab: AssetPath,
    pub binding: RendererBinding,
    pub slots: MaterialSlots,
    /// Policy for imported color textures
    pub import: ImportSettings,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            staging_root: PathBuf::from("skyboxes"),
            template_material: AssetPath::new("templates", "DepthSkyboxMaterial"),
            base_prefab: AssetPath::new("templates", "DepthSkybox"),
            binding: RendererBinding::default(),
            slots: MaterialSlots::default(),
            import: ImportSettings::SKYBOX,
        }
    }
}

impl SkyboxConfig {
    /// Reads a JSON config, any missing field keeps its default
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read skybox config {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Malformed skybox config {}", path.display()))
    }
}
