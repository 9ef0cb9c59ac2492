use depthbox_assets::{AssetErrors, AssetPath};
use depthbox_scene::SceneErrors;
use std::path::PathBuf;
use thiserror::Error;

/// A template or one of its binding points could not be located
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Template {0} does not exist")]
    MissingTemplate(AssetPath),
    #[error("{0}")]
    WrongKind(AssetErrors),
    #[error("Template material {material} declares no {slot:?} slot")]
    MissingSlot { material: AssetPath, slot: String },
    #[error("Template {template} has no usable renderer binding point: {source}")]
    MissingBindingPoint {
        template: AssetPath,
        #[source]
        source: SceneErrors,
    },
    #[error("Refusing to overwrite template {0} with derived output")]
    TemplateOverwrite(AssetPath),
}

#[derive(Debug, Error)]
pub enum SkyboxError {
    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to import {path}: {source}")]
    Import {
        path: AssetPath,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("Depth estimation failed: {0}")]
    Depth(#[source] anyhow::Error),
    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: AssetPath,
        #[source]
        source: anyhow::Error,
    },
    #[error("Fetching {id} from the generation service failed: {source}")]
    Remote {
        id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Asset database failure: {0}")]
    Database(#[source] anyhow::Error),
    #[error("{0:?} cannot name a skybox")]
    InvalidName(String),
}

impl SkyboxError {
    /// Split a persistence failure into an I/O error when the database hit the filesystem
    pub(crate) fn persist(path: &AssetPath, source: anyhow::Error) -> Self {
        match source.downcast::<std::io::Error>() {
            Ok(io) => SkyboxError::Io {
                path: PathBuf::from(path.to_string()),
                source: io,
            },
            Err(source) => SkyboxError::Persist {
                path: path.clone(),
                source,
            },
        }
    }
}
