//! The icon provider: owns one readiness registry, drives the sprite load
//! for it and hands out read-only views to everything below it.

use crate::document::SpriteDocument;
use crate::error::SpriteLoadError;
use crate::readiness::{Readiness, ReadinessHandle, ReadinessWriter};
use crate::render::IconRenderer;
use crate::resolver::NameResolver;
use crate::session::{Injection, LoadFailure, Session};
use crate::source::SpriteSource;
use arcade_domain::config::IconsConfig;
use arcade_domain::constants::{DEFAULT_ICON_SIZE, DEFAULT_SPRITE_PATH};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, error, info};

/// Provider options.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Where the sprite is fetched from.
    pub sprite_path: String,
    /// Icon size used when a request sets neither `size` nor width/height.
    pub default_size: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { sprite_path: DEFAULT_SPRITE_PATH.to_owned(), default_size: DEFAULT_ICON_SIZE }
    }
}

impl From<&IconsConfig> for ProviderConfig {
    fn from(config: &IconsConfig) -> Self {
        Self { sprite_path: config.sprite_path.clone(), default_size: config.default_size }
    }
}

/// How a provider's load ended.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// This provider fetched the sprite and injected it into the session.
    Injected(Arc<SpriteDocument>),
    /// The session already had the sprite; nothing was fetched.
    AlreadyLoaded,
    /// The load failed; the error is on the readiness state.
    Failed,
}

/// Owner of one readiness registry.
///
/// Dropping the provider aborts a pending load and retires the registry, so
/// a fetch that resolves afterwards writes nothing.
#[derive(Debug)]
pub struct IconProvider {
    session: Session,
    readiness: Readiness,
    config: ProviderConfig,
    task: Option<AbortHandle>,
}

impl IconProvider {
    /// A provider that has not started loading.
    ///
    /// If the session already carries the sprite the provider is ready
    /// immediately.
    #[must_use]
    pub fn new(session: Session, config: ProviderConfig) -> Self {
        let readiness = Readiness::new();
        if session.is_loaded() {
            readiness.writer().mark_loaded();
        }
        Self { session, readiness, config, task: None }
    }

    /// Creates a provider and starts loading on the current Tokio runtime.
    ///
    /// Without a runtime the load cannot start; the failure is logged and
    /// recorded like any other load error.
    #[must_use]
    pub fn mount(session: Session, source: Arc<dyn SpriteSource>, config: ProviderConfig) -> Self {
        let mut provider = Self::new(session, config);
        if provider.readiness.handle().is_loaded() {
            debug!(path = %provider.config.sprite_path, "Sprite container already present; skipping fetch");
            return provider;
        }

        let writer = provider.readiness.writer();
        let path = provider.config.sprite_path.clone();
        match Handle::try_current() {
            Ok(runtime) => {
                let session = provider.session.clone();
                let task = runtime.spawn(async move {
                    settle(&session, &writer, &path, source.as_ref()).await;
                });
                provider.task = Some(task.abort_handle());
            },
            Err(e) => {
                let failure = SpriteLoadError::Internal {
                    message: e.to_string().into(),
                    context: Some("No async runtime to load the sprite on".into()),
                };
                error!(path = %path, error = %failure, "Error loading SVG sprite");
                writer.record_error(failure);
            },
        }
        provider
    }

    /// Loads the sprite on the caller's task.
    ///
    /// A provider loads at most once: once its flag has settled, this returns
    /// the settled outcome without fetching. Mount a new provider to retry.
    pub async fn load(&self, source: &dyn SpriteSource) -> LoadOutcome {
        let state = self.readiness.handle().current();
        if state.is_loaded() {
            return LoadOutcome::AlreadyLoaded;
        }
        if state.error().is_some() {
            return LoadOutcome::Failed;
        }
        settle(&self.session, &self.readiness.writer(), &self.config.sprite_path, source).await
    }

    #[must_use]
    pub fn readiness(&self) -> ReadinessHandle {
        self.readiness.handle()
    }

    #[must_use]
    pub fn resolver(&self) -> NameResolver {
        NameResolver::new(self.session.clone())
    }

    #[must_use]
    pub fn renderer(&self) -> IconRenderer {
        IconRenderer::new(self.readiness.handle(), self.resolver(), self.config.default_size)
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Whether a mounted load is still in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for IconProvider {
    fn drop(&mut self) {
        if let Some(task) = self.task.take()
            && !task.is_finished()
        {
            debug!(path = %self.config.sprite_path, "Provider dropped; cancelling sprite load");
            task.abort();
        }
    }
}

async fn settle(
    session: &Session,
    writer: &ReadinessWriter,
    path: &str,
    source: &dyn SpriteSource,
) -> LoadOutcome {
    match session.load(source, path).await {
        Ok(Injection::Fresh(sprite)) => {
            info!(path, definitions = sprite.len(), "SVG sprite injected");
            writer.mark_loaded();
            LoadOutcome::Injected(sprite)
        },
        Ok(Injection::Existing(sprite)) => {
            debug!(path, definitions = sprite.len(), "Reusing sprite injected earlier in this session");
            writer.mark_loaded();
            LoadOutcome::AlreadyLoaded
        },
        Err(LoadFailure::Fetched(e)) => {
            error!(path, status = e.status(), error = %e, "Error loading SVG sprite");
            writer.record_error(e);
            LoadOutcome::Failed
        },
        Err(LoadFailure::Shared(e)) => {
            debug!(path, error = %e, "Sprite load failed on a concurrent provider");
            writer.record_error(e);
            LoadOutcome::Failed
        },
    }
}
