use thiserror::Error;

use crate::{ArtifactKind, AssetPath};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetErrors {
    #[error("An artifact already occupies {0}")]
    Occupied(AssetPath),
    #[error("Expected a {expected:?} at {path}, found a {found:?}")]
    KindMismatch {
        path: AssetPath,
        expected: ArtifactKind,
        found: ArtifactKind,
    },
    #[error("Asset name {0:?} is empty or contains a path separator")]
    InvalidName(String),
}
