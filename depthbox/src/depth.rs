//! Depth estimation over an imported color texture.
//!
//! The estimator itself is a collaborator. Each run opens a [`DepthSession`] that holds whatever
//! compute resources the estimator needs, and the session is released exactly once no matter how
//! the run ends.

use crate::SkyboxError;
use anyhow::{Context, anyhow, bail};
use depthbox_assets::{AssetPath, AssetPersistor, Texture};
use derivative::Derivative;
use image::{DynamicImage, ImageBuffer, Luma};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Raw per pixel depth values in row major order
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

/// Decode domain of a depth texture. Texel `0` maps to `min`, full intensity to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f32,
    pub max: f32,
}

impl DepthRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Smallest and largest finite value, `None` when there is none
    pub fn observe(values: &[f32]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some(Self::new(v, v)),
                Some(Self { min, max }) => Some(Self::new(min.min(v), max.max(v))),
            })
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Maps a depth into `[0, 1]`. A flat range maps everything to `0`.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span > 0.0 && value.is_finite() {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Post-processed depth ready to be imported
#[derive(Debug, Clone, PartialEq)]
pub struct DepthEstimate {
    pub image: DynamicImage,
    pub range: DepthRange,
}

impl DepthEstimate {
    /// Normalizes a raw buffer over its observed range into a 16-bit image
    pub fn from_buffer(buffer: &DepthBuffer) -> anyhow::Result<Self> {
        let expected = buffer.width as usize * buffer.height as usize;
        if buffer.values.len() != expected {
            bail!(
                "Depth buffer holds {} values, {}x{} needs {}",
                buffer.values.len(),
                buffer.width,
                buffer.height,
                expected
            );
        }
        let range = DepthRange::observe(&buffer.values).context("Depth buffer has no finite values")?;
        let image = ImageBuffer::from_fn(buffer.width, buffer.height, |x, y| {
            let value = buffer.values[(y * buffer.width + x) as usize];
            Luma([(range.normalize(value) * u16::MAX as f32).round() as u16])
        });
        Ok(Self {
            image: DynamicImage::ImageLuma16(image),
            range,
        })
    }
}

/// Produces depth for color textures
pub trait DepthEstimator: Send + Sync {
    /// Acquire the resources needed to estimate depth for `color`
    fn begin(&self, color: &Texture) -> anyhow::Result<Box<dyn DepthSession>>;
}

pub trait DepthSession: Send {
    fn estimate(&mut self) -> anyhow::Result<DepthBuffer>;

    fn post_process(&mut self, raw: DepthBuffer) -> anyhow::Result<DepthEstimate>;

    /// Free everything acquired by [`DepthEstimator::begin`]
    fn release(&mut self);
}

/// Owns a session and releases it once, either explicitly or on drop
struct SessionGuard {
    session: Option<Box<dyn DepthSession>>,
}

impl SessionGuard {
    fn begin(estimator: &dyn DepthEstimator, color: &Texture) -> anyhow::Result<Self> {
        Ok(Self {
            session: Some(estimator.begin(color)?),
        })
    }

    fn session(&mut self) -> anyhow::Result<&mut Box<dyn DepthSession>> {
        self.session
            .as_mut()
            .ok_or_else(|| anyhow!("Depth session already released"))
    }

    fn estimate(&mut self) -> anyhow::Result<DepthEstimate> {
        let session = self.session()?;
        let raw = session.estimate()?;
        session.post_process(raw)
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
            tracing::trace!("Released depth session");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Result of a depth run: the persisted texture and its decode range
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDepth {
    pub texture: Texture,
    pub range: DepthRange,
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct DepthGenerator {
    #[derivative(Debug = "ignore")]
    estimator: Arc<dyn DepthEstimator>,
}

impl DepthGenerator {
    pub fn new(estimator: Arc<dyn DepthEstimator>) -> Self {
        Self { estimator }
    }

    /// Estimates depth for `color` and persists it at `out`.
    ///
    /// The session is released before returning, on success as well as on every failure after
    /// it was opened.
    pub fn generate(
        &self,
        color: &Texture,
        persistor: &AssetPersistor,
        out: &AssetPath,
    ) -> Result<GeneratedDepth, SkyboxError> {
        let mut session =
            SessionGuard::begin(self.estimator.as_ref(), color).map_err(SkyboxError::Depth)?;
        let estimate = session.estimate().map_err(SkyboxError::Depth)?;
        if !estimate.range.is_valid() {
            return Err(SkyboxError::Depth(anyhow!(
                "Estimator produced an unusable range {:?}",
                estimate.range
            )));
        }
        let depth_size = (estimate.image.width(), estimate.image.height());
        if depth_size != (color.width(), color.height()) {
            return Err(SkyboxError::Depth(anyhow!(
                "Depth is {}x{} but its color texture is {}x{}",
                depth_size.0,
                depth_size.1,
                color.width(),
                color.height()
            )));
        }
        let texture = Texture::import_depth(estimate.image);
        persistor
            .create_or_replace(texture.clone(), out)
            .map_err(|source| SkyboxError::persist(out, source))?;
        session.release();
        tracing::debug!(
            "Depth for {} spans [{}, {}]",
            out,
            estimate.range.min,
            estimate.range.max
        );
        Ok(GeneratedDepth {
            texture,
            range: estimate.range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthbox_assets::{AssetDatabase, ImportSettings, MemoryAssetDatabase, TextureUsage};
    use image::RgbImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Gradient {
        releases: Arc<AtomicUsize>,
        range: DepthRange,
        /// Fixed output size instead of the color texture's
        size: Option<(u32, u32)>,
    }

    struct GradientSession {
        releases: Arc<AtomicUsize>,
        range: DepthRange,
        width: u32,
        height: u32,
    }

    impl DepthEstimator for Gradient {
        fn begin(&self, color: &Texture) -> anyhow::Result<Box<dyn DepthSession>> {
            let (width, height) = self.size.unwrap_or((color.width(), color.height()));
            Ok(Box::new(GradientSession {
                releases: self.releases.clone(),
                range: self.range,
                width,
                height,
            }))
        }
    }

    impl DepthSession for GradientSession {
        fn estimate(&mut self) -> anyhow::Result<DepthBuffer> {
            let count = (self.width * self.height) as usize;
            let step = (self.range.max - self.range.min) / (count - 1) as f32;
            let mut values: Vec<f32> =
                (0..count).map(|i| self.range.min + step * i as f32).collect();
            values[count - 1] = self.range.max;
            Ok(DepthBuffer {
                width: self.width,
                height: self.height,
                values,
            })
        }

        fn post_process(&mut self, raw: DepthBuffer) -> anyhow::Result<DepthEstimate> {
            DepthEstimate::from_buffer(&raw)
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn color() -> Texture {
        Texture::import_color(
            DynamicImage::ImageRgb8(RgbImage::new(8, 4)),
            ImportSettings::SKYBOX,
        )
    }

    #[test]
    fn observe_skips_non_finite_values() {
        let range = DepthRange::observe(&[f32::NAN, 3.0, -1.5, f32::INFINITY, 2.0]).unwrap();
        assert_eq!(range, DepthRange::new(-1.5, 3.0));
        assert!(DepthRange::observe(&[f32::NAN]).is_none());
        assert!(DepthRange::observe(&[]).is_none());
    }

    #[test]
    fn validity() {
        assert!(DepthRange::new(0.5, 0.5).is_valid());
        assert!(!DepthRange::new(2.0, 1.0).is_valid());
        assert!(!DepthRange::new(f32::NAN, 1.0).is_valid());
        assert_eq!(DepthRange::new(1.0, 1.0).normalize(1.0), 0.0);
    }

    #[test]
    fn estimate_from_buffer_normalizes() {
        let buffer = DepthBuffer {
            width: 2,
            height: 1,
            values: vec![2.0, 10.0],
        };
        let estimate = DepthEstimate::from_buffer(&buffer).unwrap();
        assert_eq!(estimate.range, DepthRange::new(2.0, 10.0));
        let luma = estimate.image.to_luma16();
        assert_eq!(luma.get_pixel(0, 0).0, [0]);
        assert_eq!(luma.get_pixel(1, 0).0, [u16::MAX]);
    }

    #[test]
    fn mis_sized_buffers_are_rejected() {
        let buffer = DepthBuffer {
            width: 4,
            height: 4,
            values: vec![1.0; 3],
        };
        assert!(DepthEstimate::from_buffer(&buffer).is_err());
    }

    #[test]
    fn generate_persists_and_releases_once() {
        let db = Arc::new(MemoryAssetDatabase::new());
        let persistor = AssetPersistor::new(db.clone());
        let releases = Arc::new(AtomicUsize::new(0));
        let generator = DepthGenerator::new(Arc::new(Gradient {
            releases: releases.clone(),
            range: DepthRange::new(0.25, 40.0),
            size: None,
        }));
        let out = AssetPath::parse("skyboxes/dunes/dunes_depth");

        let depth = generator.generate(&color(), &persistor, &out).unwrap();
        assert_eq!(depth.range, DepthRange::new(0.25, 40.0));
        assert_eq!(depth.texture.usage, TextureUsage::Depth);
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        let stored = db.load(&out).unwrap().unwrap().into_texture(&out).unwrap();
        assert_eq!((stored.width(), stored.height()), (8, 4));
    }

    #[test]
    fn depth_must_match_color_size() {
        let db = Arc::new(MemoryAssetDatabase::new());
        let persistor = AssetPersistor::new(db.clone());
        let releases = Arc::new(AtomicUsize::new(0));
        let generator = DepthGenerator::new(Arc::new(Gradient {
            releases: releases.clone(),
            range: DepthRange::new(0.25, 40.0),
            size: Some((2, 1)),
        }));
        let out = AssetPath::parse("skyboxes/dunes/dunes_depth");

        let err = generator.generate(&color(), &persistor, &out).unwrap_err();
        assert!(matches!(err, SkyboxError::Depth(_)));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(db.load(&out).unwrap().is_none());
    }
}
