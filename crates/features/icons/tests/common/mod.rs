#![allow(dead_code, unreachable_pub)]

use arcade_icons::{SpriteFuture, SpriteLoadError, SpriteSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub const SHEET: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" style="display: none">
  <symbol id="home" viewBox="0 0 24 24"><path d="M3 9l9-7 9 7v11H3z"/></symbol>
  <symbol id="search" viewBox="0 0 24 24"><circle cx="11" cy="11" r="8"/></symbol>
</svg>"#;

/// Sprite source that counts fetches and answers with a canned result.
#[derive(Debug)]
pub struct CountingSource {
    calls: AtomicUsize,
    status: Option<u16>,
    delay: Duration,
    gate: Option<Arc<Notify>>,
}

impl CountingSource {
    pub fn ok() -> Self {
        Self { calls: AtomicUsize::new(0), status: None, delay: Duration::ZERO, gate: None }
    }

    pub fn failing(status: u16) -> Self {
        Self { status: Some(status), ..Self::ok() }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Holds every fetch until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpriteSource for CountingSource {
    fn fetch<'a>(&'a self, path: &'a str) -> SpriteFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.status {
                Some(status) => Err(SpriteLoadError::Status {
                    status,
                    reason: "Not Found".into(),
                    context: Some(path.to_owned().into()),
                }),
                None => Ok(SHEET.to_owned()),
            }
        })
    }
}

pub mod logs {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};

    /// Counts `error` level events.
    #[derive(Debug, Clone, Default)]
    pub struct ErrorCounter(Arc<AtomicUsize>);

    impl ErrorCounter {
        pub fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
