//! Where sprite sheets come from.

use crate::error::{SpriteLoadError, SpriteLoadErrorExt};
use arcade_domain::config::IconsConfig;
use reqwest::{Client, Url};
use std::fmt::Debug;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Future returned by [`SpriteSource::fetch`].
pub type SpriteFuture<'a> = Pin<Box<dyn Future<Output = Result<String, SpriteLoadError>> + Send + 'a>>;

/// A single fetch of sprite markup by path.
///
/// Implementations perform exactly one request per call and never retry.
pub trait SpriteSource: Debug + Send + Sync {
    fn fetch<'a>(&'a self, path: &'a str) -> SpriteFuture<'a>;
}

/// Chooses the source described by the `[icons]` config section:
/// HTTP when an `origin` is set, the local asset directory otherwise.
///
/// # Errors
/// Returns [`SpriteLoadError::InvalidPath`] for an unparsable origin and
/// [`SpriteLoadError::Transport`] if the HTTP client cannot be built.
pub fn from_config(config: &IconsConfig) -> Result<Arc<dyn SpriteSource>, SpriteLoadError> {
    Ok(match &config.origin {
        Some(origin) => Arc::new(HttpSpriteSource::new(origin)?),
        None => Arc::new(FileSpriteSource::new(&config.assets_dir)),
    })
}

/// Fetches the sprite over HTTP, resolving paths against an origin.
#[derive(Debug, Clone)]
pub struct HttpSpriteSource {
    client: Client,
    origin: Url,
}

impl HttpSpriteSource {
    /// # Errors
    /// Returns [`SpriteLoadError::InvalidPath`] if `origin` is not an absolute URL.
    pub fn new(origin: &str) -> Result<Self, SpriteLoadError> {
        let client = Client::builder().build().context("Building HTTP client")?;
        Self::with_client(client, origin)
    }

    /// # Errors
    /// Returns [`SpriteLoadError::InvalidPath`] if `origin` is not an absolute URL.
    pub fn with_client(client: Client, origin: &str) -> Result<Self, SpriteLoadError> {
        let origin = Url::parse(origin).map_err(|e| SpriteLoadError::InvalidPath {
            message: format!("{origin}: {e}").into(),
            context: Some("Parsing sprite origin".into()),
        })?;
        Ok(Self { client, origin })
    }

    /// The absolute URL `path` resolves to.
    ///
    /// # Errors
    /// Returns [`SpriteLoadError::InvalidPath`] if the path cannot be joined.
    pub fn url_for(&self, path: &str) -> Result<Url, SpriteLoadError> {
        self.origin.join(path).map_err(|e| SpriteLoadError::InvalidPath {
            message: format!("{path}: {e}").into(),
            context: Some(self.origin.to_string().into()),
        })
    }
}

impl SpriteSource for HttpSpriteSource {
    fn fetch<'a>(&'a self, path: &'a str) -> SpriteFuture<'a> {
        Box::pin(async move {
            let url = self.url_for(path)?;
            debug!(%url, "Fetching SVG sprite");

            let response =
                self.client.get(url.clone()).send().await.context(format!("GET {url}"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SpriteLoadError::Status {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").into(),
                    context: Some(url.to_string().into()),
                });
            }

            response.text().await.context(format!("Reading body of {url}"))
        })
    }
}

/// Reads the sprite from a static asset directory, the way a web server
/// would serve `public/sprite.svg` for `/sprite.svg`.
///
/// A missing file is reported as status `404 Not Found`.
#[derive(Debug, Clone)]
pub struct FileSpriteSource {
    root: PathBuf,
}

impl FileSpriteSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a URL-style path onto the asset directory.
    ///
    /// # Errors
    /// Returns [`SpriteLoadError::InvalidPath`] for empty paths and paths that
    /// would leave the asset directory.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SpriteLoadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes || relative.as_os_str().is_empty() {
            return Err(SpriteLoadError::InvalidPath {
                message: path.to_owned().into(),
                context: Some(self.root.display().to_string().into()),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl SpriteSource for FileSpriteSource {
    fn fetch<'a>(&'a self, path: &'a str) -> SpriteFuture<'a> {
        Box::pin(async move {
            let file = self.resolve(path)?;
            debug!(file = %file.display(), "Reading SVG sprite");

            match tokio::fs::read_to_string(&file).await {
                Ok(markup) => Ok(markup),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(SpriteLoadError::Status {
                    status: 404,
                    reason: "Not Found".into(),
                    context: Some(file.display().to_string().into()),
                }),
                Err(e) => Err(e).context(file.display().to_string()),
            }
        })
    }
}
