//! Depth skybox asset derivation.
//!
//! A panoramic color image, read from disk or fetched from a generation service, is imported as a
//! texture, run through a depth estimator, and turned into four artifacts inside one staging
//! directory: the color texture, the depth texture, a material binding both with the depth range,
//! and a prefab using that material. A live instance of the prefab is placed in the working scene.

pub mod compose;
mod config;
pub mod depth;
mod error;
mod ingest;
mod layout;
mod pipeline;
pub mod progress;
pub mod remote;

pub use config::{MaterialSlots, RendererBinding, SkyboxConfig};
pub use error::{ResourceError, SkyboxError};
pub use ingest::{AssetIngestor, ImportedTexture, IngestOutcome};
pub use layout::StagingLayout;
pub use pipeline::{SkyboxAssets, SkyboxOutcome, SkyboxPipeline};

pub mod prelude {
    pub use crate::depth::{DepthBuffer, DepthEstimate, DepthEstimator, DepthRange, DepthSession};
    pub use crate::progress::{ProgressReporter, TracingProgress};
    pub use crate::remote::{HttpImageSource, RemoteImageSource};
    pub use crate::{SkyboxAssets, SkyboxConfig, SkyboxError, SkyboxOutcome, SkyboxPipeline};
    pub use depthbox_assets::{AssetDatabase, FsAssetDatabase, MemoryAssetDatabase};
}
