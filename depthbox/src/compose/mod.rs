//! Derives the material and prefab of a skybox from their templates.

mod material;
mod prefab;

pub use material::{MaterialComposer, MaterialInputs};
pub use prefab::PrefabComposer;

use crate::{ResourceError, SkyboxError};
use depthbox_assets::{Artifact, AssetDatabase, AssetErrors, AssetPath};

/// Loads a template, which must exist and be of the kind `convert` accepts
fn load_template<T>(
    database: &dyn AssetDatabase,
    path: &AssetPath,
    convert: impl FnOnce(Artifact, &AssetPath) -> Result<T, AssetErrors>,
) -> Result<T, SkyboxError> {
    let artifact = database
        .load(path)
        .map_err(SkyboxError::Database)?
        .ok_or_else(|| ResourceError::MissingTemplate(path.clone()))?;
    Ok(convert(artifact, path).map_err(ResourceError::WrongKind)?)
}

/// Derived output must never land on the template it came from
fn check_not_template(template: &AssetPath, out: &AssetPath) -> Result<(), SkyboxError> {
    if template == out {
        return Err(ResourceError::TemplateOverwrite(template.clone()).into());
    }
    Ok(())
}
