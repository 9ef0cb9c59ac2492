use crate::SkyboxError;
use crate::remote::RemoteImageSource;
use anyhow::anyhow;
use depthbox_assets::{AssetPath, AssetPersistor, ImportSettings, Texture};
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// A color texture after it was persisted and resolved again through the database
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTexture {
    pub path: AssetPath,
    pub texture: Texture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Ready(ImportedTexture),
    /// The remote source has nothing under the requested id
    NotFound,
}

/// Brings source images into the database as color textures
#[derive(Debug, Clone)]
pub struct AssetIngestor {
    persistor: AssetPersistor,
    settings: ImportSettings,
}

impl AssetIngestor {
    pub fn new(persistor: AssetPersistor, settings: ImportSettings) -> Self {
        Self {
            persistor,
            settings,
        }
    }

    pub fn local(&self, source: &Path, dest: &AssetPath) -> Result<ImportedTexture, SkyboxError> {
        let io = |source_err| SkyboxError::Io {
            path: source.to_path_buf(),
            source: source_err,
        };
        let bytes = std::fs::read(source).map_err(io)?;
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(io)?
            .decode()
            .map_err(|err| SkyboxError::Import {
                path: dest.clone(),
                source: anyhow!("{} is not a decodable image: {err}", source.display()),
            })?;
        self.import(image, dest)
    }

    /// Fetches `id` and imports it. The fetched image is only held until it is imported.
    pub async fn remote<R: RemoteImageSource>(
        &self,
        remote: &R,
        id: &str,
        dest: &AssetPath,
    ) -> Result<IngestOutcome, SkyboxError> {
        let fetched = remote
            .get_by_id(id)
            .await
            .map_err(|source| SkyboxError::Remote {
                id: id.to_string(),
                source,
            })?;
        match fetched {
            Some(image) => Ok(IngestOutcome::Ready(self.import(image, dest)?)),
            None => Ok(IngestOutcome::NotFound),
        }
    }

    fn import(&self, image: DynamicImage, dest: &AssetPath) -> Result<ImportedTexture, SkyboxError> {
        let texture = Texture::import_color(image, self.settings);
        self.persistor
            .create_or_replace(texture, dest)
            .map_err(|source| SkyboxError::persist(dest, source))?;

        let import_err = |source| SkyboxError::Import {
            path: dest.clone(),
            source,
        };
        let database = self.persistor.database();
        database.refresh().map_err(import_err)?;
        let texture = database
            .load(dest)
            .map_err(import_err)?
            .ok_or_else(|| import_err(anyhow!("Imported texture cannot be resolved")))?
            .into_texture(dest)
            .map_err(|err| import_err(err.into()))?;
        tracing::debug!("Imported {} ({}x{})", dest, texture.width(), texture.height());
        Ok(ImportedTexture {
            path: dest.clone(),
            texture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthbox_assets::{AssetDatabase, MemoryAssetDatabase, TextureUsage};
    use image::{Rgb, RgbImage};
    use std::sync::Arc;

    fn ingestor(db: Arc<MemoryAssetDatabase>) -> AssetIngestor {
        AssetIngestor::new(AssetPersistor::new(db), ImportSettings::SKYBOX)
    }

    #[test]
    fn local_png_becomes_color_texture() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("lagoon.png");
        RgbImage::from_pixel(32, 16, Rgb([0, 90, 200])).save(&source).unwrap();
        let db = Arc::new(MemoryAssetDatabase::new());
        let dest = AssetPath::parse("skyboxes/lagoon/lagoon_rgb");

        let imported = ingestor(db.clone()).local(&source, &dest).unwrap();
        assert_eq!(imported.path, dest);
        assert_eq!(imported.texture.usage, TextureUsage::Color);
        assert_eq!((imported.texture.width(), imported.texture.height()), (32, 16));
        assert!(db.load(&dest).unwrap().is_some());
    }

    #[test]
    fn missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(MemoryAssetDatabase::new());
        let result = ingestor(db.clone()).local(
            &dir.path().join("nowhere.png"),
            &AssetPath::parse("skyboxes/nowhere/nowhere_rgb"),
        );
        assert!(matches!(result, Err(SkyboxError::Io { .. })));
        assert!(db.is_empty());
    }

    #[test]
    fn undecodable_source_is_import_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.png");
        std::fs::write(&source, b"definitely not a png").unwrap();
        let db = Arc::new(MemoryAssetDatabase::new());
        let result = ingestor(db).local(&source, &AssetPath::parse("skyboxes/notes/notes_rgb"));
        assert!(matches!(result, Err(SkyboxError::Import { .. })));
    }
}
