use crate::{AssetErrors, AssetPath, Material, Prefab, Texture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Texture,
    Material,
    Prefab,
}

/// Anything the database can persist at an [`AssetPath`]
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Texture(Texture),
    Material(Material),
    Prefab(Prefab),
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Texture(_) => ArtifactKind::Texture,
            Artifact::Material(_) => ArtifactKind::Material,
            Artifact::Prefab(_) => ArtifactKind::Prefab,
        }
    }

    fn mismatch(&self, path: &AssetPath, expected: ArtifactKind) -> AssetErrors {
        AssetErrors::KindMismatch {
            path: path.clone(),
            expected,
            found: self.kind(),
        }
    }

    pub fn into_texture(self, path: &AssetPath) -> Result<Texture, AssetErrors> {
        match self {
            Artifact::Texture(texture) => Ok(texture),
            other => Err(other.mismatch(path, ArtifactKind::Texture)),
        }
    }

    pub fn into_material(self, path: &AssetPath) -> Result<Material, AssetErrors> {
        match self {
            Artifact::Material(material) => Ok(material),
            other => Err(other.mismatch(path, ArtifactKind::Material)),
        }
    }

    pub fn into_prefab(self, path: &AssetPath) -> Result<Prefab, AssetErrors> {
        match self {
            Artifact::Prefab(prefab) => Ok(prefab),
            other => Err(other.mismatch(path, ArtifactKind::Prefab)),
        }
    }
}

impl From<Texture> for Artifact {
    fn from(value: Texture) -> Self {
        Artifact::Texture(value)
    }
}

impl From<Material> for Artifact {
    fn from(value: Material) -> Self {
        Artifact::Material(value)
    }
}

impl From<Prefab> for Artifact {
    fn from(value: Prefab) -> Self {
        Artifact::Prefab(value)
    }
}
