//! Fetching generated panoramas from a remote service.

use anyhow::{Context, anyhow, bail};
use image::{DynamicImage, ImageReader};
use reqwest::{StatusCode, Url};
use std::io::Cursor;

/// A service holding generated panoramas keyed by an opaque id
pub trait RemoteImageSource: Sync {
    /// Resolves to `Ok(None)` when no image exists for `id`
    fn get_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<DynamicImage>>> + Send;
}

/// Fetches panoramas over HTTP.
///
/// The URL template carries a `{id}` path segment, which is replaced by the percent-encoded id.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
    template: Url,
}

fn is_id_segment(segment: &str) -> bool {
    segment == "{id}" || segment.eq_ignore_ascii_case("%7Bid%7D")
}

impl HttpImageSource {
    pub fn new(url_template: &str) -> anyhow::Result<Self> {
        Self::with_client(reqwest::Client::new(), url_template)
    }

    pub fn with_client(client: reqwest::Client, url_template: &str) -> anyhow::Result<Self> {
        let template = Url::parse(url_template)
            .with_context(|| format!("Invalid image URL template {url_template}"))?;
        let has_id = template
            .path_segments()
            .is_some_and(|mut segments| segments.any(is_id_segment));
        if !has_id {
            bail!("Image URL template {url_template} has no {{id}} path segment");
        }
        Ok(Self { client, template })
    }

    pub fn url_for(&self, id: &str) -> anyhow::Result<Url> {
        let mut scratch = self.template.clone();
        scratch
            .path_segments_mut()
            .map_err(|_| anyhow!("{} cannot carry an id", self.template))?
            .clear()
            .push(id);
        let encoded = scratch.path().trim_start_matches('/');

        let path = self
            .template
            .path_segments()
            .map(|segments| {
                segments
                    .map(|segment| if is_id_segment(segment) { encoded } else { segment })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        let mut url = self.template.clone();
        url.set_path(&format!("/{path}"));
        Ok(url)
    }
}

impl RemoteImageSource for HttpImageSource {
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<DynamicImage>> {
        let url = self.url_for(id)?;
        let response = self.client.get(url.clone()).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("{url} has no image");
            return Ok(None);
        }
        let bytes = response.error_for_status()?.bytes().await?;
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("{url} did not return a decodable image"))?;
        Ok(Some(image))
    }
}
