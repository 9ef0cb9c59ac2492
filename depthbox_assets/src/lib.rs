mod artifact;
pub mod database;
mod error;
mod material;
mod path;
mod persistor;
mod prefab;
mod texture;

pub use artifact::{Artifact, ArtifactKind};
pub use database::{AssetDatabase, FsAssetDatabase, MemoryAssetDatabase};
pub use error::AssetErrors;
pub use material::Material;
pub use path::AssetPath;
pub use persistor::AssetPersistor;
pub use prefab::{MeshRenderer, Prefab, SceneNode, Transform};
pub use texture::{ImportSettings, Texture, TextureCompression, TextureUsage};
