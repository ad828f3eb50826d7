//! Page-session scope: the "sprite already injected" marker.

use crate::document::SpriteDocument;
use crate::error::SpriteLoadError;
use crate::source::SpriteSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::debug;

/// One page session.
///
/// Holds the injected [`SpriteDocument`] and serializes loads so that any
/// number of providers mounted in the same session fetch the sheet at most
/// once. Cloning shares the session; [`Session::new`] starts a fresh one.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug, Default)]
struct SessionInner {
    sprite: OnceLock<Arc<SpriteDocument>>,
    // Guards the fetch and holds the last failed attempt's error.
    load_gate: Mutex<Option<Arc<SpriteLoadError>>>,
    failed_attempts: AtomicU64,
}

/// How a load through [`Session::load`] was satisfied.
#[derive(Debug, Clone)]
pub(crate) enum Injection {
    /// This call fetched and injected the sheet.
    Fresh(Arc<SpriteDocument>),
    /// A previous load in this session already injected it.
    Existing(Arc<SpriteDocument>),
}

/// How a load through [`Session::load`] failed.
#[derive(Debug, Clone)]
pub(crate) enum LoadFailure {
    /// This call fetched and the attempt failed.
    Fetched(Arc<SpriteLoadError>),
    /// This call waited on a concurrent attempt that failed.
    Shared(Arc<SpriteLoadError>),
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The injected sheet, if any. Its presence is the readiness marker.
    #[must_use]
    pub fn sprite(&self) -> Option<Arc<SpriteDocument>> {
        self.inner.sprite.get().cloned()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.sprite.get().is_some()
    }

    /// Injects a parsed sheet. The first injection wins; later calls get the
    /// already injected document back.
    pub fn inject(&self, document: SpriteDocument) -> Arc<SpriteDocument> {
        Arc::clone(self.inner.sprite.get_or_init(|| Arc::new(document)))
    }

    /// Fetches, parses and injects the sheet unless the session already has one.
    ///
    /// Concurrent callers wait for the in-flight attempt and share its outcome,
    /// success or failure. A failed attempt leaves the session empty, so a
    /// call that starts after it has settled fetches again.
    pub(crate) async fn load(
        &self,
        source: &dyn SpriteSource,
        path: &str,
    ) -> Result<Injection, LoadFailure> {
        if let Some(existing) = self.sprite() {
            debug!(path, "Sprite container already present; skipping fetch");
            return Ok(Injection::Existing(existing));
        }

        let observed = self.inner.failed_attempts.load(Ordering::Acquire);
        let mut last_failure = self.inner.load_gate.lock().await;
        if let Some(existing) = self.sprite() {
            debug!(path, "Sprite injected by a concurrent provider; skipping fetch");
            return Ok(Injection::Existing(existing));
        }
        if self.inner.failed_attempts.load(Ordering::Acquire) != observed {
            if let Some(failure) = last_failure.as_ref() {
                debug!(path, "Concurrent sprite load failed; not fetching again");
                return Err(LoadFailure::Shared(Arc::clone(failure)));
            }
        }

        match fetch_document(source, path).await {
            Ok(document) => {
                *last_failure = None;
                Ok(Injection::Fresh(self.inject(document)))
            },
            Err(e) => {
                let failure = Arc::new(e);
                *last_failure = Some(Arc::clone(&failure));
                self.inner.failed_attempts.fetch_add(1, Ordering::Release);
                Err(LoadFailure::Fetched(failure))
            },
        }
    }
}

async fn fetch_document(source: &dyn SpriteSource, path: &str) -> Result<SpriteDocument, SpriteLoadError> {
    let markup = source.fetch(path).await?;
    SpriteDocument::parse(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_injection_wins() {
        let session = Session::new();
        assert!(!session.is_loaded());

        let first = session.inject(SpriteDocument::parse("<svg><symbol id=\"a\"/></svg>").unwrap());
        let second = session.inject(SpriteDocument::parse("<svg><symbol id=\"b\"/></svg>").unwrap());

        assert!(Arc::ptr_eq(&first, &second));
        assert!(session.sprite().is_some_and(|s| s.contains("a") && !s.contains("b")));
    }

    #[test]
    fn clones_share_state_and_new_sessions_do_not() {
        let session = Session::new();
        let shared = session.clone();
        session.inject(SpriteDocument::parse("<svg/>").unwrap());

        assert!(shared.is_loaded());
        assert!(!Session::new().is_loaded());
    }

    #[derive(Debug)]
    struct NotFound(AtomicU64);

    impl SpriteSource for NotFound {
        fn fetch<'a>(&'a self, _path: &'a str) -> crate::source::SpriteFuture<'a> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Err(SpriteLoadError::Status { status: 404, reason: "Not Found".into(), context: None })
            })
        }
    }

    #[tokio::test]
    async fn waiters_share_a_failed_attempt() {
        let session = Session::new();
        let source = NotFound(AtomicU64::new(0));

        let (first, second) = tokio::join!(session.load(&source, "/sprite.svg"), session.load(&source, "/sprite.svg"));

        let (Err(LoadFailure::Fetched(fetched)), Err(LoadFailure::Shared(shared))) = (first, second) else {
            panic!("expected one fetched and one shared failure");
        };
        assert!(Arc::ptr_eq(&fetched, &shared));
        assert_eq!(source.0.load(Ordering::SeqCst), 1);

        assert!(matches!(session.load(&source, "/sprite.svg").await, Err(LoadFailure::Fetched(_))));
        assert_eq!(source.0.load(Ordering::SeqCst), 2, "a settled failure does not block a retry");
    }
}
