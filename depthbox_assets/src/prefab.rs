use crate::AssetPath;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Component, Serialize, Deserialize)]
pub struct Transform {
    pub scale: glam::Vec3,
    pub rotation: glam::Quat,
    pub translation: glam::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: glam::Vec3::ONE,
            rotation: glam::Quat::IDENTITY,
            translation: glam::Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale: glam::Vec3::splat(scale),
            ..Default::default()
        }
    }
}

/// Draws `mesh` with one material per submesh
#[derive(Debug, Clone, PartialEq, Default, Component, Serialize, Deserialize)]
pub struct MeshRenderer {
    pub mesh: String,
    pub materials: Vec<Option<AssetPath>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub renderer: Option<MeshRenderer>,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            renderer: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_renderer(mut self, renderer: MeshRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Resolve a `/` separated path of child names relative to this node. The empty path is this
    /// node.
    pub fn find(&self, path: &str) -> Option<&SceneNode> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| {
                node.children.iter().find(|child| child.name == segment)
            })
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }
}

/// A persisted, reusable node tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub root: SceneNode,
}

impl Prefab {
    pub fn new(root: SceneNode) -> Self {
        Self { root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skybox() -> SceneNode {
        SceneNode::new("DepthSkybox").with_child(
            SceneNode::new("Sphere")
                .with_transform(Transform::from_scale(500.0))
                .with_renderer(MeshRenderer {
                    mesh: "InvertedSphere".to_string(),
                    materials: vec![None],
                }),
        )
    }

    #[test]
    fn find_resolves_relative_paths() {
        let root = skybox();
        assert_eq!(root.find("").map(|n| n.name.as_str()), Some("DepthSkybox"));
        assert_eq!(root.find("Sphere").map(|n| n.name.as_str()), Some("Sphere"));
        assert_eq!(root.find("/Sphere/").map(|n| n.name.as_str()), Some("Sphere"));
        assert!(root.find("Sphere/Missing").is_none());
        assert_eq!(root.node_count(), 2);
    }

    #[test]
    fn prefab_survives_json() {
        let prefab = Prefab::new(skybox());
        let json = serde_json::to_string(&prefab).unwrap();
        let back: Prefab = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefab);
    }
}
