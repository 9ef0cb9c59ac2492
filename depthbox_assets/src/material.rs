use crate::AssetPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A shader plus its uniform values. Slots exist only once declared, binding to an undeclared
/// slot is refused so a template that lacks a uniform is detected instead of silently extended.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    pub shader: String,
    #[serde(default)]
    pub textures: BTreeMap<String, Option<AssetPath>>,
    #[serde(default)]
    pub scalars: BTreeMap<String, f32>,
}

impl Material {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            ..Default::default()
        }
    }

    /// Declare an unbound texture slot
    pub fn with_texture_slot(mut self, slot: impl Into<String>) -> Self {
        self.textures.insert(slot.into(), None);
        self
    }

    /// Declare a scalar slot with its default value
    pub fn with_scalar_slot(mut self, slot: impl Into<String>, value: f32) -> Self {
        self.scalars.insert(slot.into(), value);
        self
    }

    pub fn has_texture_slot(&self, slot: &str) -> bool {
        self.textures.contains_key(slot)
    }

    pub fn has_scalar_slot(&self, slot: &str) -> bool {
        self.scalars.contains_key(slot)
    }

    pub fn texture(&self, slot: &str) -> Option<&AssetPath> {
        self.textures.get(slot).and_then(|t| t.as_ref())
    }

    pub fn scalar(&self, slot: &str) -> Option<f32> {
        self.scalars.get(slot).copied()
    }

    /// Returns `false` if the slot was never declared
    pub fn set_texture(&mut self, slot: &str, texture: AssetPath) -> bool {
        match self.textures.get_mut(slot) {
            Some(bound) => {
                *bound = Some(texture);
                true
            }
            None => false,
        }
    }

    /// Returns `false` if the slot was never declared
    pub fn set_scalar(&mut self, slot: &str, value: f32) -> bool {
        match self.scalars.get_mut(slot) {
            Some(bound) => {
                *bound = value;
                true
            }
            None => false,
        }
    }
}
