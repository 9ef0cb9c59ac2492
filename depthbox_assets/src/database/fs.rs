use super::AssetDatabase;
use crate::{
    Artifact, ArtifactKind, AssetErrors, AssetPath, ImportSettings, Material, Prefab, Texture,
    TextureUsage,
};
use anyhow::Context;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TEXTURE_EXTENSION: &str = "png";
const TEXTURE_META_EXTENSION: &str = "png.meta";
const MATERIAL_EXTENSION: &str = "material.json";
const PREFAB_EXTENSION: &str = "prefab.json";

/// Lookup order when probing a path
const KINDS: [(ArtifactKind, &str); 3] = [
    (ArtifactKind::Texture, TEXTURE_EXTENSION),
    (ArtifactKind::Material, MATERIAL_EXTENSION),
    (ArtifactKind::Prefab, PREFAB_EXTENSION),
];

/// Sidecar stored next to every texture
#[derive(Debug, Serialize, Deserialize)]
struct TextureMeta {
    usage: TextureUsage,
    settings: ImportSettings,
}

/// Database backed by a directory tree.
///
/// Textures are PNG files with a JSON sidecar, materials and prefabs are JSON. Every write lands in
/// a hidden temporary file first and is renamed into place, so readers either see the previous
/// state or the complete new artifact.
#[derive(Debug)]
pub struct FsAssetDatabase {
    root: PathBuf,
    cache: DashMap<AssetPath, Artifact>,
}

impl FsAssetDatabase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: DashMap::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location on disk of `path` stored with `extension`
    pub fn file_path(&self, path: &AssetPath, extension: &str) -> PathBuf {
        self.root
            .join(path.dir())
            .join(format!("{}.{}", path.name(), extension))
    }

    fn occupied_by(&self, path: &AssetPath) -> Option<ArtifactKind> {
        KINDS
            .iter()
            .find(|(_, extension)| self.file_path(path, extension).is_file())
            .map(|(kind, _)| *kind)
    }

    fn read(&self, path: &AssetPath, kind: ArtifactKind) -> anyhow::Result<Artifact> {
        match kind {
            ArtifactKind::Texture => {
                let file = self.file_path(path, TEXTURE_EXTENSION);
                let image = image::open(&file)
                    .with_context(|| format!("Failed to decode {}", file.display()))?;
                let meta_file = self.file_path(path, TEXTURE_META_EXTENSION);
                let meta = match fs::read(&meta_file) {
                    Ok(bytes) => serde_json::from_slice::<TextureMeta>(&bytes)?,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => TextureMeta {
                        usage: TextureUsage::Color,
                        settings: ImportSettings::default(),
                    },
                    Err(e) => return Err(e.into()),
                };
                Ok(Artifact::Texture(Texture {
                    usage: meta.usage,
                    settings: meta.settings,
                    image: Arc::new(image),
                }))
            }
            ArtifactKind::Material => {
                let bytes = fs::read(self.file_path(path, MATERIAL_EXTENSION))?;
                Ok(Artifact::Material(serde_json::from_slice::<Material>(
                    &bytes,
                )?))
            }
            ArtifactKind::Prefab => {
                let bytes = fs::read(self.file_path(path, PREFAB_EXTENSION))?;
                Ok(Artifact::Prefab(serde_json::from_slice::<Prefab>(&bytes)?))
            }
        }
    }
}

/// Write through a temporary sibling, then rename over `target`
fn write_atomic(
    target: &Path,
    write: impl FnOnce(&Path) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let file_name = target
        .file_name()
        .with_context(|| format!("{} has no file name", target.display()))?;
    let temporary = target.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));
    let written = write(&temporary).and_then(|_| Ok(fs::rename(&temporary, target)?));
    if written.is_err() {
        let _ = fs::remove_file(&temporary);
    }
    written
}

fn write_json<T: Serialize>(target: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    write_atomic(target, |temporary| Ok(fs::write(temporary, &json)?))
}

fn remove_if_exists(file: &Path) -> anyhow::Result<bool> {
    match fs::remove_file(file) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl AssetDatabase for FsAssetDatabase {
    fn load(&self, path: &AssetPath) -> anyhow::Result<Option<Artifact>> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(Some(cached.value().clone()));
        }
        let Some(kind) = self.occupied_by(path) else {
            return Ok(None);
        };
        let artifact = self.read(path, kind)?;
        tracing::debug!("Cached {:?} {}", kind, path);
        self.cache.insert(path.clone(), artifact.clone());
        Ok(Some(artifact))
    }

    fn create(&self, artifact: &Artifact, path: &AssetPath) -> anyhow::Result<()> {
        if !path.is_valid() {
            return Err(AssetErrors::InvalidName(path.name().to_string()).into());
        }
        if self.occupied_by(path).is_some() {
            return Err(AssetErrors::Occupied(path.clone()).into());
        }
        fs::create_dir_all(self.root.join(path.dir()))?;
        self.cache.remove(path);

        match artifact {
            Artifact::Texture(texture) => {
                // The sidecar goes first; a texture only exists once its image is renamed in.
                write_json(
                    &self.file_path(path, TEXTURE_META_EXTENSION),
                    &TextureMeta {
                        usage: texture.usage,
                        settings: texture.settings,
                    },
                )?;
                write_atomic(&self.file_path(path, TEXTURE_EXTENSION), |temporary| {
                    Ok(texture
                        .image
                        .save_with_format(temporary, image::ImageFormat::Png)?)
                })
            }
            Artifact::Material(material) => {
                write_json(&self.file_path(path, MATERIAL_EXTENSION), material)
            }
            Artifact::Prefab(prefab) => write_json(&self.file_path(path, PREFAB_EXTENSION), prefab),
        }
    }

    fn delete(&self, path: &AssetPath) -> anyhow::Result<bool> {
        self.cache.remove(path);
        let mut removed = false;
        for (_, extension) in KINDS {
            removed |= remove_if_exists(&self.file_path(path, extension))?;
        }
        remove_if_exists(&self.file_path(path, TEXTURE_META_EXTENSION))?;
        Ok(removed)
    }

    fn refresh(&self) -> anyhow::Result<()> {
        tracing::debug!("Dropping {} cached artifacts", self.cache.len());
        self.cache.clear();
        Ok(())
    }

    fn create_folder(&self, dir: &Path) -> anyhow::Result<()> {
        Ok(fs::create_dir_all(self.root.join(dir))?)
    }

    fn folder_exists(&self, dir: &Path) -> bool {
        self.root.join(dir).is_dir()
    }

    fn list(&self, dir: &Path) -> anyhow::Result<Vec<AssetPath>> {
        let entries = match fs::read_dir(self.root.join(dir)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.starts_with('.') {
                continue;
            }
            let name = KINDS.iter().find_map(|(_, extension)| {
                file_name.strip_suffix(&format!(".{extension}"))
            });
            if let Some(name) = name {
                paths.push(AssetPath::new(dir, name));
            }
        }
        paths.sort();
        paths.dedup();
        Ok(paths)
    }
}
