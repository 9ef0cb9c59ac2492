use super::{check_not_template, load_template};
use crate::depth::DepthRange;
use crate::{MaterialSlots, ResourceError, SkyboxError};
use depthbox_assets::{Artifact, AssetDatabase, AssetPath, AssetPersistor, Material};

/// What a skybox material binds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialInputs<'a> {
    pub color: &'a AssetPath,
    pub depth: &'a AssetPath,
    pub range: DepthRange,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialComposer {
    slots: MaterialSlots,
}

impl MaterialComposer {
    pub fn new(slots: MaterialSlots) -> Self {
        Self { slots }
    }

    /// Clones `template`, binds the inputs into the clone, and persists it at `out`.
    /// The template itself is left untouched.
    pub fn compose(
        &self,
        database: &dyn AssetDatabase,
        persistor: &AssetPersistor,
        template: &AssetPath,
        inputs: MaterialInputs<'_>,
        out: &AssetPath,
    ) -> Result<Material, SkyboxError> {
        check_not_template(template, out)?;
        let mut material = load_template(database, template, Artifact::into_material)?;
        self.bind(&mut material, template, inputs)?;
        persistor
            .create_or_replace(material.clone(), out)
            .map_err(|source| SkyboxError::persist(out, source))?;
        tracing::debug!("Composed {} from {}", out, template);
        Ok(material)
    }

    fn bind(
        &self,
        material: &mut Material,
        template: &AssetPath,
        inputs: MaterialInputs<'_>,
    ) -> Result<(), ResourceError> {
        let missing = |slot: &str| ResourceError::MissingSlot {
            material: template.clone(),
            slot: slot.to_string(),
        };
        let slots = &self.slots;
        for (slot, texture) in [(&slots.color, inputs.color), (&slots.depth, inputs.depth)] {
            if !material.set_texture(slot, texture.clone()) {
                return Err(missing(slot.as_str()));
            }
        }
        for (slot, value) in [
            (&slots.min_range, inputs.range.min),
            (&slots.max_range, inputs.range.max),
        ] {
            if !material.set_scalar(slot, value) {
                return Err(missing(slot.as_str()));
            }
        }
        Ok(())
    }
}
