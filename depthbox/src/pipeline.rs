use crate::compose::{MaterialComposer, MaterialInputs, PrefabComposer};
use crate::depth::{DepthEstimator, DepthGenerator, DepthRange};
use crate::progress::{ProgressReporter, ProgressScope, TracingProgress};
use crate::remote::RemoteImageSource;
use crate::{AssetIngestor, ImportedTexture, IngestOutcome, SkyboxConfig, SkyboxError, StagingLayout};
use bevy_ecs::entity::Entity;
use depthbox_assets::{AssetDatabase, AssetPath, AssetPersistor};
use depthbox_scene::WorkingScene;
use derivative::Derivative;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

const PROGRESS_TITLE: &str = "Depth skybox";

/// Everything a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct SkyboxAssets {
    pub name: String,
    pub color: AssetPath,
    pub depth: AssetPath,
    pub material: AssetPath,
    pub prefab: AssetPath,
    pub range: DepthRange,
    /// Live instance of `prefab` in the working scene
    pub instance: Entity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkyboxOutcome {
    Created(SkyboxAssets),
    /// The generation service has nothing under this id yet, nothing was derived
    NotFound { id: String },
}

/// Derives depth skyboxes into an asset database and instantiates them into a working scene.
///
/// Runs take `&mut self`, so one pipeline processes one skybox at a time. Every run ends every
/// progress indicator it began and releases its depth session, whether it succeeds or not.
/// A failed run keeps whatever artifacts it already persisted.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct SkyboxPipeline {
    config: SkyboxConfig,
    #[derivative(Debug = "ignore")]
    database: Arc<dyn AssetDatabase>,
    persistor: AssetPersistor,
    ingestor: AssetIngestor,
    depth: DepthGenerator,
    materials: MaterialComposer,
    prefabs: PrefabComposer,
    #[derivative(Debug = "ignore")]
    progress: Arc<dyn ProgressReporter>,
    #[derivative(Debug = "ignore")]
    scene: WorkingScene,
}

impl SkyboxPipeline {
    pub fn new(
        config: SkyboxConfig,
        database: Arc<dyn AssetDatabase>,
        estimator: Arc<dyn DepthEstimator>,
    ) -> Self {
        let persistor = AssetPersistor::new(database.clone());
        Self {
            ingestor: AssetIngestor::new(persistor.clone(), config.import),
            depth: DepthGenerator::new(estimator),
            materials: MaterialComposer::new(config.slots.clone()),
            prefabs: PrefabComposer::new(config.binding.clone()),
            progress: Arc::new(TracingProgress::new()),
            scene: WorkingScene::new(),
            config,
            database,
            persistor,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    #[inline]
    pub fn config(&self) -> &SkyboxConfig {
        &self.config
    }

    #[inline]
    pub fn database(&self) -> &Arc<dyn AssetDatabase> {
        &self.database
    }

    #[inline]
    pub fn scene(&self) -> &WorkingScene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut WorkingScene {
        &mut self.scene
    }

    /// Artifacts of a skybox named `name` staged under `dir`, relative to the staging root
    pub fn layout(&self, dir: &str, name: &str) -> StagingLayout {
        StagingLayout::new(self.config.staging_root.join(dir), name)
    }

    /// Derives a skybox from an image on disk, named after the file stem
    pub fn from_file(&mut self, source: &Path) -> Result<SkyboxAssets, SkyboxError> {
        let name = source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| SkyboxError::InvalidName(source.display().to_string()))?;
        let name = valid_name(name)?;
        let layout = self.layout(&name, &name);
        info!("Deriving skybox {} from {}", name, source.display());

        let color = {
            let _progress = ProgressScope::begin(
                self.progress.clone(),
                PROGRESS_TITLE,
                &format!("Importing {}", source.display()),
            );
            self.create_staging(&layout)?;
            self.ingestor.local(source, &layout.color())?
        };
        self.derive(&layout, color)
    }

    /// Derives a skybox from the image the generation service holds under `id`.
    ///
    /// Artifacts are staged in a directory named by `id` and named by `name`, or by `id` when
    /// `name` is empty. When the service has no image the staging directory exists afterwards
    /// but holds nothing.
    pub async fn from_remote<R: RemoteImageSource>(
        &mut self,
        remote: &R,
        id: &str,
        name: &str,
    ) -> Result<SkyboxOutcome, SkyboxError> {
        let dir = valid_name(id)?;
        let name = if name.is_empty() { dir.clone() } else { valid_name(name)? };
        let layout = self.layout(&dir, &name);
        info!("Deriving skybox {} from remote image {}", name, id);

        let outcome = {
            let _progress = ProgressScope::begin(
                self.progress.clone(),
                PROGRESS_TITLE,
                &format!("Fetching {id}"),
            );
            self.create_staging(&layout)?;
            self.ingestor.remote(remote, id, &layout.color()).await?
        };
        match outcome {
            IngestOutcome::Ready(color) => Ok(SkyboxOutcome::Created(self.derive(&layout, color)?)),
            IngestOutcome::NotFound => {
                warn!("No remote image exists for {}", id);
                Ok(SkyboxOutcome::NotFound { id: id.to_string() })
            }
        }
    }

    fn create_staging(&self, layout: &StagingLayout) -> Result<(), SkyboxError> {
        self.database
            .create_folder(layout.dir())
            .map_err(SkyboxError::Database)
    }

    /// Depth, material, then prefab for an imported color texture
    fn derive(
        &mut self,
        layout: &StagingLayout,
        color: ImportedTexture,
    ) -> Result<SkyboxAssets, SkyboxError> {
        let depth_path = layout.depth();
        let depth = {
            let _progress = ProgressScope::begin(
                self.progress.clone(),
                PROGRESS_TITLE,
                &format!("Estimating depth for {}", layout.name()),
            );
            self.depth
                .generate(&color.texture, &self.persistor, &depth_path)?
        };
        drop(color.texture);

        let _progress = ProgressScope::begin(
            self.progress.clone(),
            PROGRESS_TITLE,
            &format!("Composing {}", layout.name()),
        );
        let material_path = layout.material();
        self.materials.compose(
            self.database.as_ref(),
            &self.persistor,
            &self.config.template_material,
            MaterialInputs {
                color: &color.path,
                depth: &depth_path,
                range: depth.range,
            },
            &material_path,
        )?;
        let prefab_path = layout.prefab();
        let instance = self.prefabs.compose(
            &mut self.scene,
            &self.persistor,
            &self.config.base_prefab,
            &material_path,
            &prefab_path,
        )?;

        info!(
            "Skybox {} ready, depth spans [{}, {}]",
            layout.name(),
            depth.range.min,
            depth.range.max
        );
        Ok(SkyboxAssets {
            name: layout.name().to_string(),
            color: color.path,
            depth: depth_path,
            material: material_path,
            prefab: prefab_path,
            range: depth.range,
            instance,
        })
    }
}

fn valid_name(name: &str) -> Result<String, SkyboxError> {
    if AssetPath::new("", name).is_valid() {
        Ok(name.to_string())
    } else {
        Err(SkyboxError::InvalidName(name.to_string()))
    }
}
