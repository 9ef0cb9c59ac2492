mod components;
mod error;
mod scene;
mod transient;

pub use components::{NodeName, NodeOf, PrefabInstance};
pub use error::SceneErrors;
pub use scene::WorkingScene;
pub use transient::TransientInstance;
