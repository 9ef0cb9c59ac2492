use derivative::Derivative;
use image::DynamicImage;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureCompression {
    Uncompressed,
    #[default]
    Compressed,
    HighQualityCompressed,
}

/// Import policy applied to every texture entering the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Largest allowed side in pixels, larger images are downsized keeping their aspect ratio
    pub max_dimension: u32,
    pub compression: TextureCompression,
}

impl ImportSettings {
    /// Policy for panoramic color textures
    pub const SKYBOX: Self = Self {
        max_dimension: 4096,
        compression: TextureCompression::HighQualityCompressed,
    };

    /// Depth maps are stored losslessly, compressing them would corrupt the decode domain
    pub const DEPTH: Self = Self {
        max_dimension: 4096,
        compression: TextureCompression::Uncompressed,
    };

    pub fn apply(&self, image: DynamicImage) -> DynamicImage {
        if image.width() > self.max_dimension || image.height() > self.max_dimension {
            image.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3)
        } else {
            image
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self::SKYBOX
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureUsage {
    /// 8-bit RGBA color
    Color,
    /// 16-bit single channel, normalized over a depth range held elsewhere
    Depth,
}

/// An imported texture. Pixel data is shared, cloning a texture is cheap.
#[derive(Derivative, Clone)]
#[derivative(Debug, PartialEq)]
pub struct Texture {
    pub usage: TextureUsage,
    pub settings: ImportSettings,
    #[derivative(Debug = "ignore")]
    pub image: Arc<DynamicImage>,
}

impl Texture {
    /// Imports a decoded color image, consuming it
    pub fn import_color(image: DynamicImage, settings: ImportSettings) -> Self {
        let image = settings.apply(image);
        Self {
            usage: TextureUsage::Color,
            settings,
            image: Arc::new(DynamicImage::ImageRgba8(image.into_rgba8())),
        }
    }

    pub fn import_depth(image: DynamicImage) -> Self {
        let settings = ImportSettings::DEPTH;
        let image = settings.apply(image);
        Self {
            usage: TextureUsage::Depth,
            settings,
            image: Arc::new(DynamicImage::ImageLuma16(image.into_luma16())),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
